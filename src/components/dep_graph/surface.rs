//! Drawable surface sizing. The surface grows with the content so nothing
//! the simulation pushes outward is clipped.

use super::error::GraphError;
use super::store::Point;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	pub fn center(self) -> Point {
		Point::new(self.width / 2.0, self.height / 2.0)
	}

	pub fn validate(self) -> Result<(), GraphError> {
		let ok = |v: f64| v.is_finite() && v > 0.0;
		if ok(self.width) && ok(self.height) {
			Ok(())
		} else {
			Err(GraphError::InvalidViewport {
				width: self.width,
				height: self.height,
			})
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub min: Point,
	pub max: Point,
}

impl Bounds {
	pub fn of(points: impl IntoIterator<Item = Point>) -> Option<Self> {
		points.into_iter().fold(None, |acc, p| {
			Some(match acc {
				None => Bounds { min: p, max: p },
				Some(b) => Bounds {
					min: Point::new(b.min.x.min(p.x), b.min.y.min(p.y)),
					max: Point::new(b.max.x.max(p.x), b.max.y.max(p.y)),
				},
			})
		})
	}

	pub fn width(&self) -> f64 {
		self.max.x - self.min.x
	}

	pub fn height(&self) -> f64 {
		self.max.y - self.min.y
	}
}

/// Size of the drawable surface and the translation applied to content.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceFrame {
	pub width: f64,
	pub height: f64,
	pub translate: Point,
}

impl SurfaceFrame {
	pub fn empty(viewport: Viewport) -> Self {
		Self {
			width: viewport.width,
			height: viewport.height,
			translate: Point::default(),
		}
	}

	/// At least the viewport, or the padded content box when larger; content
	/// shifted so its top-left corner lands on the padding.
	pub fn fit(points: impl IntoIterator<Item = Point>, viewport: Viewport, padding: f64) -> Self {
		let Some(bounds) = Bounds::of(points) else {
			return Self::empty(viewport);
		};
		Self {
			width: viewport.width.max(bounds.width() + 2.0 * padding),
			height: viewport.height.max(bounds.height() + 2.0 * padding),
			translate: Point::new(padding - bounds.min.x, padding - bounds.min.y),
		}
	}

	pub fn to_content(&self, surface: Point) -> Point {
		Point::new(surface.x - self.translate.x, surface.y - self.translate.y)
	}

	pub fn to_surface(&self, content: Point) -> Point {
		Point::new(content.x + self.translate.x, content.y + self.translate.y)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn small_content_keeps_viewport_size() {
		let frame = SurfaceFrame::fit(
			[Point::new(100.0, 100.0), Point::new(200.0, 150.0)],
			Viewport::new(800.0, 600.0),
			50.0,
		);
		assert_eq!((frame.width, frame.height), (800.0, 600.0));
		assert_eq!(frame.translate, Point::new(-50.0, -50.0));
	}

	#[test]
	fn drifting_content_grows_surface_and_stays_visible() {
		let points = [Point::new(-300.0, 20.0), Point::new(900.0, 1000.0)];
		let frame = SurfaceFrame::fit(points, Viewport::new(800.0, 600.0), 50.0);
		assert_eq!((frame.width, frame.height), (1300.0, 1080.0));
		for p in points {
			let s = frame.to_surface(p);
			assert!(s.x >= 50.0 && s.x <= frame.width - 50.0);
			assert!(s.y >= 50.0 && s.y <= frame.height - 50.0);
		}
	}

	#[test]
	fn surface_and_content_coordinates_invert() {
		let frame = SurfaceFrame::fit([Point::new(-10.0, 5.0)], Viewport::new(10.0, 10.0), 4.0);
		let p = Point::new(3.0, -7.0);
		assert_eq!(frame.to_content(frame.to_surface(p)), p);
	}

	#[test]
	fn empty_content() {
		let viewport = Viewport::new(640.0, 480.0);
		assert_eq!(SurfaceFrame::fit([], viewport, 50.0), SurfaceFrame::empty(viewport));
	}

	#[test]
	fn viewport_validation() {
		assert!(Viewport::new(1.0, 1.0).validate().is_ok());
		assert!(Viewport::new(-1.0, 1.0).validate().is_err());
		assert!(Viewport::new(1.0, f64::INFINITY).validate().is_err());
	}
}
