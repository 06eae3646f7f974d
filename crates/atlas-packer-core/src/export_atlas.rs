use crate::model::PackingResult;
use crate::pipeline::tight_bounds;

/// Build a Spine/libGDX region atlas (plain text, one page).
///
/// `size`, `orig` and `xy` use the placed footprint; `offset` is `0, 0` and
/// `index` is `-1` for every region.
pub fn to_region_atlas<K: ToString>(result: &PackingResult<K>, texture_file_name: &str) -> String {
    let (max_right, max_bottom) = tight_bounds(&result.placements);
    let mut s = String::new();
    s.push_str(texture_file_name);
    s.push('\n');
    s.push_str(&format!("size: {}, {}\n", max_right, max_bottom));
    s.push_str("format: RGBA8888\n");
    s.push_str("filter: Linear,Linear\n");
    s.push_str("repeat: none\n");
    s.push('\n');

    for p in &result.placements {
        let (x, y, w, h) = (p.frame.x, p.frame.y, p.frame.w, p.frame.h);
        s.push_str(&p.key.to_string());
        s.push('\n');
        s.push_str(&format!("  rotate: {}\n", p.rotated));
        s.push_str(&format!("  xy: {}, {}\n", x, y));
        s.push_str(&format!("  size: {}, {}\n", w, h));
        s.push_str(&format!("  orig: {}, {}\n", w, h));
        s.push_str("  offset: 0, 0\n");
        s.push_str("  index: -1\n");
        s.push('\n');
    }
    s
}
