use crate::common::*;

/// The generic inclusive rectangle.
pub trait Rect {
    type Type;

    fn t(&self) -> Self::Type;
    fn l(&self) -> Self::Type;
    fn b(&self) -> Self::Type;
    fn r(&self) -> Self::Type;

    /// Number of rows covered, counting both edges.
    fn h(&self) -> Self::Type;

    /// Number of columns covered, counting both edges.
    fn w(&self) -> Self::Type;

    fn try_from_tlbr(tlbr: [Self::Type; 4]) -> Result<Self>
    where
        Self: Sized;
}

pub trait RectNum: Rect
where
    Self::Type: Copy + Num + PartialOrd,
{
    fn tlbr(&self) -> [Self::Type; 4] {
        [self.t(), self.l(), self.b(), self.r()]
    }

    /// The extent as an `(h, w)` array shape.
    fn hw(&self) -> (Self::Type, Self::Type) {
        (self.h(), self.w())
    }

    fn contains(&self, y: Self::Type, x: Self::Type) -> bool {
        self.t() <= y && y <= self.b() && self.l() <= x && x <= self.r()
    }
}

impl<R> RectNum for R
where
    R: Rect,
    R::Type: Copy + Num + PartialOrd,
{
}
