//! Drawing backend seam.
//!
//! The renderer speaks to a [`Surface`]: the handful of immediate-mode 2D
//! calls it needs, with the same argument order and transform semantics as
//! the browser's `CanvasRenderingContext2d`. The browser implementation is
//! compiled with the `hydrate` feature; tests draw into a recorder.

use crate::camera::TransformOp;

/// Immediate-mode 2D drawing target.
pub trait Surface {
    /// Error raised by fallible canvas calls.
    type Error;

    /// Replace the current transform with the matrix `[a b c d e f]`.
    ///
    /// # Errors
    ///
    /// Propagates backend failures.
    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<(), Self::Error>;
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    /// # Errors
    ///
    /// Propagates backend failures.
    fn translate(&mut self, x: f64, y: f64) -> Result<(), Self::Error>;
    /// # Errors
    ///
    /// Propagates backend failures.
    fn rotate(&mut self, radians: f64) -> Result<(), Self::Error>;
    /// # Errors
    ///
    /// Propagates backend failures.
    fn scale(&mut self, x: f64, y: f64) -> Result<(), Self::Error>;
    fn save(&mut self);
    fn restore(&mut self);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn close_path(&mut self);
    /// # Errors
    ///
    /// Propagates backend failures (e.g. a negative radius).
    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> Result<(), Self::Error>;
    fn fill(&mut self);
    fn stroke(&mut self);
    fn set_fill_style(&mut self, css: &str);
    fn set_stroke_style(&mut self, css: &str);
    fn set_line_width(&mut self, width: f64);

    /// Issue one view-stack operation.
    ///
    /// # Errors
    ///
    /// Propagates backend failures.
    fn apply_op(&mut self, op: &TransformOp) -> Result<(), Self::Error> {
        match *op {
            TransformOp::Translate { dx, dy } => self.translate(dx, dy),
            TransformOp::Rotate { radians } => self.rotate(radians),
            TransformOp::Scale { sx, sy } => self.scale(sx, sy),
        }
    }
}

#[cfg(feature = "hydrate")]
impl Surface for web_sys::CanvasRenderingContext2d {
    type Error = wasm_bindgen::JsValue;

    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<(), Self::Error> {
        web_sys::CanvasRenderingContext2d::set_transform(self, a, b, c, d, e, f)
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        web_sys::CanvasRenderingContext2d::clear_rect(self, x, y, width, height);
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), Self::Error> {
        web_sys::CanvasRenderingContext2d::translate(self, x, y)
    }

    fn rotate(&mut self, radians: f64) -> Result<(), Self::Error> {
        web_sys::CanvasRenderingContext2d::rotate(self, radians)
    }

    fn scale(&mut self, x: f64, y: f64) -> Result<(), Self::Error> {
        web_sys::CanvasRenderingContext2d::scale(self, x, y)
    }

    fn save(&mut self) {
        web_sys::CanvasRenderingContext2d::save(self);
    }

    fn restore(&mut self) {
        web_sys::CanvasRenderingContext2d::restore(self);
    }

    fn begin_path(&mut self) {
        web_sys::CanvasRenderingContext2d::begin_path(self);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        web_sys::CanvasRenderingContext2d::move_to(self, x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        web_sys::CanvasRenderingContext2d::line_to(self, x, y);
    }

    fn close_path(&mut self) {
        web_sys::CanvasRenderingContext2d::close_path(self);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> Result<(), Self::Error> {
        web_sys::CanvasRenderingContext2d::arc(self, x, y, radius, start, end)
    }

    fn fill(&mut self) {
        web_sys::CanvasRenderingContext2d::fill(self);
    }

    fn stroke(&mut self) {
        web_sys::CanvasRenderingContext2d::stroke(self);
    }

    fn set_fill_style(&mut self, css: &str) {
        self.set_fill_style_str(css);
    }

    fn set_stroke_style(&mut self, css: &str) {
        self.set_stroke_style_str(css);
    }

    fn set_line_width(&mut self, width: f64) {
        web_sys::CanvasRenderingContext2d::set_line_width(self, width);
    }
}

/// A surface that records every call, for tests.
#[cfg(test)]
pub(crate) mod recording {
    use super::Surface;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Call {
        SetTransform([f64; 6]),
        ClearRect(f64, f64, f64, f64),
        Translate(f64, f64),
        Rotate(f64),
        Scale(f64, f64),
        Save,
        Restore,
        BeginPath,
        MoveTo(f64, f64),
        LineTo(f64, f64),
        ClosePath,
        Arc { x: f64, y: f64, radius: f64 },
        Fill,
        Stroke,
        FillStyle(String),
        StrokeStyle(String),
        LineWidth(f64),
    }

    #[derive(Debug, Default)]
    pub(crate) struct Recorder {
        pub(crate) calls: Vec<Call>,
    }

    impl Recorder {
        pub(crate) fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.calls.iter().filter(|c| pred(c)).count()
        }

        pub(crate) fn arcs(&self) -> Vec<(f64, f64, f64)> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Arc { x, y, radius } => Some((*x, *y, *radius)),
                    _ => None,
                })
                .collect()
        }
    }

    impl Surface for Recorder {
        type Error = std::convert::Infallible;

        fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<(), Self::Error> {
            self.calls.push(Call::SetTransform([a, b, c, d, e, f]));
            Ok(())
        }
        fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
            self.calls.push(Call::ClearRect(x, y, width, height));
        }
        fn translate(&mut self, x: f64, y: f64) -> Result<(), Self::Error> {
            self.calls.push(Call::Translate(x, y));
            Ok(())
        }
        fn rotate(&mut self, radians: f64) -> Result<(), Self::Error> {
            self.calls.push(Call::Rotate(radians));
            Ok(())
        }
        fn scale(&mut self, x: f64, y: f64) -> Result<(), Self::Error> {
            self.calls.push(Call::Scale(x, y));
            Ok(())
        }
        fn save(&mut self) {
            self.calls.push(Call::Save);
        }
        fn restore(&mut self) {
            self.calls.push(Call::Restore);
        }
        fn begin_path(&mut self) {
            self.calls.push(Call::BeginPath);
        }
        fn move_to(&mut self, x: f64, y: f64) {
            self.calls.push(Call::MoveTo(x, y));
        }
        fn line_to(&mut self, x: f64, y: f64) {
            self.calls.push(Call::LineTo(x, y));
        }
        fn close_path(&mut self) {
            self.calls.push(Call::ClosePath);
        }
        fn arc(&mut self, x: f64, y: f64, radius: f64, _start: f64, _end: f64) -> Result<(), Self::Error> {
            self.calls.push(Call::Arc { x, y, radius });
            Ok(())
        }
        fn fill(&mut self) {
            self.calls.push(Call::Fill);
        }
        fn stroke(&mut self) {
            self.calls.push(Call::Stroke);
        }
        fn set_fill_style(&mut self, css: &str) {
            self.calls.push(Call::FillStyle(css.to_owned()));
        }
        fn set_stroke_style(&mut self, css: &str) {
            self.calls.push(Call::StrokeStyle(css.to_owned()));
        }
        fn set_line_width(&mut self, width: f64) {
            self.calls.push(Call::LineWidth(width));
        }
    }
}
