use super::Rect;
use crate::common::*;

/// Inclusive bounding box in TLBR format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TLBR<T> {
    pub(crate) t: T,
    pub(crate) l: T,
    pub(crate) b: T,
    pub(crate) r: T,
}

impl<T> TLBR<T>
where
    T: Copy + Num + PartialOrd,
{
    /// A box covering the single pixel at `(y, x)`.
    pub fn from_point(y: T, x: T) -> Self {
        Self {
            t: y,
            l: x,
            b: y,
            r: x,
        }
    }

    /// Grow the box until it covers the pixel at `(y, x)`.
    pub fn extend_to(&mut self, y: T, x: T) {
        if y < self.t {
            self.t = y;
        }
        if y > self.b {
            self.b = y;
        }
        if x < self.l {
            self.l = x;
        }
        if x > self.r {
            self.r = x;
        }
    }
}

impl TLBR<usize> {
    /// The covered row indices.
    pub fn rows(&self) -> RangeInclusive<usize> {
        self.t..=self.b
    }

    /// The covered column indices.
    pub fn cols(&self) -> RangeInclusive<usize> {
        self.l..=self.r
    }
}

impl<T> Rect for TLBR<T>
where
    T: Copy + Num + PartialOrd,
{
    type Type = T;

    fn t(&self) -> Self::Type {
        self.t
    }

    fn l(&self) -> Self::Type {
        self.l
    }

    fn b(&self) -> Self::Type {
        self.b
    }

    fn r(&self) -> Self::Type {
        self.r
    }

    fn h(&self) -> Self::Type {
        self.b - self.t + T::one()
    }

    fn w(&self) -> Self::Type {
        self.r - self.l + T::one()
    }

    fn try_from_tlbr(tlbr: [Self::Type; 4]) -> Result<Self> {
        let [t, l, b, r] = tlbr;
        ensure!(b >= t && r >= l, "b >= t and r >= l must hold");

        Ok(Self { t, l, b, r })
    }
}
