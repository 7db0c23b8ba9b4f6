// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG export of recorded scenes.
//!
//! The world layer is emitted inside a single `<g>` carrying the
//! world-to-view matrix, so note geometry stays in world units. The overlay
//! layer follows in view coordinates. Output is stable for a given scene,
//! which makes it usable for snapshot-style tests and offline rendering.

use alloc::format;
use alloc::string::String;
use core::fmt::Write as _;

use kurbo::{Affine, Rect};
use peniko::Color;

use crate::scene::{DrawOp, Scene};
use crate::text::{Font, FontFamily};

impl Scene {
    /// Serializes the frame as a standalone SVG document.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let size = self.view_rect.size();
        let (w, h) = (fmt_f64(size.width), fmt_f64(size.height));
        let mut out = String::new();
        let _ = writeln!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">"
        );
        let _ = writeln!(
            out,
            "<rect x=\"0\" y=\"0\" width=\"{w}\" height=\"{h}\"{}/>",
            fill_attrs(self.background)
        );
        // Overlay coordinates are relative to the view rectangle origin.
        let origin = Affine::translate(-self.view_rect.origin().to_vec2());
        let _ = writeln!(
            out,
            "<g transform=\"{}\">",
            affine_to_svg_matrix(origin * self.world_to_view)
        );
        for op in &self.world {
            write_op(&mut out, op);
        }
        let _ = writeln!(out, "</g>");
        if origin == Affine::IDENTITY {
            for op in &self.overlay {
                write_op(&mut out, op);
            }
        } else {
            let _ = writeln!(out, "<g transform=\"{}\">", affine_to_svg_matrix(origin));
            for op in &self.overlay {
                write_op(&mut out, op);
            }
            let _ = writeln!(out, "</g>");
        }
        let _ = writeln!(out, "</svg>");
        out
    }
}

fn write_op(out: &mut String, op: &DrawOp) {
    match op {
        DrawOp::FillRect { rect, color } => {
            write_rect(out, *rect, &fill_attrs(*color));
        }
        DrawOp::StrokeRect {
            rect,
            color,
            width,
            dashed,
        } => {
            let (hex, alpha) = color_to_svg(*color);
            let mut style = format!(" fill=\"none\" stroke=\"{hex}\" stroke-width=\"{}\"", fmt_f64(*width));
            if alpha < 1.0 {
                let _ = write!(style, " stroke-opacity=\"{}\"", fmt_f64(f64::from(alpha)));
            }
            if *dashed {
                style.push_str(" stroke-dasharray=\"4 3\"");
            }
            write_rect(out, *rect, &style);
        }
        DrawOp::Text {
            origin,
            text,
            font,
            color,
        } => {
            let _ = writeln!(
                out,
                "<text x=\"{}\" y=\"{}\"{}{} dominant-baseline=\"hanging\">{}</text>",
                fmt_f64(origin.x),
                fmt_f64(origin.y),
                font_attrs(font),
                fill_attrs(*color),
                escape_text(text)
            );
        }
    }
}

fn write_rect(out: &mut String, rect: Rect, style: &str) {
    let _ = writeln!(
        out,
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"{style}/>",
        fmt_f64(rect.x0),
        fmt_f64(rect.y0),
        fmt_f64(rect.width()),
        fmt_f64(rect.height()),
    );
}

fn font_attrs(font: &Font) -> String {
    let family = match font.family {
        FontFamily::SansSerif => "sans-serif",
        FontFamily::Monospace => "monospace",
    };
    let mut attrs = format!(
        " font-family=\"{family}\" font-size=\"{}\"",
        fmt_f64(font.size)
    );
    if font.bold {
        attrs.push_str(" font-weight=\"bold\"");
    }
    attrs
}

fn fill_attrs(color: Color) -> String {
    let (hex, alpha) = color_to_svg(color);
    if alpha < 1.0 {
        format!(" fill=\"{hex}\" fill-opacity=\"{}\"", fmt_f64(f64::from(alpha)))
    } else {
        format!(" fill=\"{hex}\"")
    }
}

fn color_to_svg(color: Color) -> (String, f32) {
    let rgba = color.to_rgba8();
    let a = f32::from(rgba.a) / 255.0;
    (format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b), a)
}

fn affine_to_svg_matrix(xf: Affine) -> String {
    // [a b c d e f] maps to the SVG matrix of the same order.
    let c = xf.as_coeffs();
    format!(
        "matrix({} {} {} {} {} {})",
        fmt_f64(c[0]),
        fmt_f64(c[1]),
        fmt_f64(c[2]),
        fmt_f64(c[3]),
        fmt_f64(c[4]),
        fmt_f64(c[5]),
    )
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn fmt_f64(v: f64) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    if v.abs() < 1e15 {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "only whole values in range take this path"
        )]
        let i = v as i64;
        #[allow(clippy::cast_precision_loss, reason = "compared against the source value")]
        let whole = i as f64 == v;
        if whole {
            return format!("{i}");
        }
    }
    let mut s = format!("{v:.3}");
    while s.contains('.') && s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" {
        s.remove(0);
    }
    s
}
