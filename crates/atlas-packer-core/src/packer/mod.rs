use crate::model::{Placement, Rect};

pub mod shelf;
pub mod skyline;

/// A packer places sprites into a single atlas.
///
/// Implementations must ensure no overlaps and keep `padding` between sprites.
/// `rect` carries the unrotated sprite size in `w,h` (`x,y` are ignored).
/// `pack` returns `None` without changing state if the sprite cannot be placed.
pub trait Packer<K> {
    fn can_pack(&self, rect: &Rect) -> bool;
    fn pack(&mut self, key: K, rect: &Rect) -> Option<Placement<K>>;
}
