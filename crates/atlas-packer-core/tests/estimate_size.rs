use atlas_packer_core::config::PackerConfig;
use atlas_packer_core::estimate::{ceil_sqrt, estimate_size};
use atlas_packer_core::model::SpriteSpec;

fn specs(sizes: &[(u32, u32)]) -> Vec<SpriteSpec> {
    sizes
        .iter()
        .enumerate()
        .map(|(i, (w, h))| SpriteSpec::new(format!("s{i}"), *w, *h))
        .collect()
}

#[test]
fn padded_area_of_three_squares() {
    let cfg = PackerConfig::builder().padding(2).build();
    // 3 * (12 * 12) = 432, ceil(sqrt(432)) = 21
    assert_eq!(estimate_size(&specs(&[(10, 10); 3]), &cfg), (21, 21));
}

#[test]
fn exact_square_area_is_not_rounded_up() {
    let cfg = PackerConfig::builder().padding(0).build();
    assert_eq!(estimate_size(&specs(&[(8, 8); 4]), &cfg), (16, 16));
    assert_eq!(estimate_size(&specs(&[(8, 8), (8, 8), (8, 8), (8, 9)]), &cfg), (17, 17));
}

#[test]
fn rotation_does_not_change_padded_area() {
    let tall = specs(&[(10, 40), (6, 20)]);
    let on = PackerConfig::builder().padding(3).allow_rotation(true).build();
    let off = PackerConfig::builder().padding(3).allow_rotation(false).build();
    assert_eq!(estimate_size(&tall, &on), estimate_size(&tall, &off));
}

#[test]
fn estimate_is_clamped_to_maxima() {
    let cfg = PackerConfig::builder()
        .with_max_dimensions(512, 2048)
        .padding(0)
        .build();
    // 100 * 100 * 100 = 1_000_000 -> 1000
    assert_eq!(estimate_size(&specs(&[(100, 100); 100]), &cfg), (512, 1000));
}

#[test]
fn empty_input_estimates_zero() {
    let cfg = PackerConfig::default();
    assert_eq!(estimate_size(&specs(&[]), &cfg), (0, 0));
}

#[test]
fn ceil_sqrt_is_exact() {
    assert_eq!(ceil_sqrt(0), 0);
    assert_eq!(ceil_sqrt(1), 1);
    assert_eq!(ceil_sqrt(2), 2);
    assert_eq!(ceil_sqrt(4), 2);
    assert_eq!(ceil_sqrt(5), 3);
    assert_eq!(ceil_sqrt(432), 21);
    assert_eq!(ceil_sqrt(441), 21);
    assert_eq!(ceil_sqrt(442), 22);
    // float sqrt is not exact at this magnitude
    let big = (1u64 << 31) + 1;
    let s = ceil_sqrt(big * big);
    assert_eq!(s, big);
    assert_eq!(ceil_sqrt(big * big + 1), big + 1);
    assert_eq!(ceil_sqrt(u64::MAX), 1u64 << 32);
}
