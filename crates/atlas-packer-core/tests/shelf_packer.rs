use atlas_packer_core::config::PackerConfig;
use atlas_packer_core::error::AtlasPackerError;
use atlas_packer_core::model::Rect;
use atlas_packer_core::packer::Packer;
use atlas_packer_core::packer::shelf::ShelfPacker;
use atlas_packer_core::pack_layout;

#[test]
fn three_squares_fill_one_row() {
    let cfg = PackerConfig::builder().padding(2).build();
    let mut p = ShelfPacker::new(&cfg, 100);

    let a = p.insert(10, 10).expect("a");
    let b = p.insert(10, 10).expect("b");
    let c = p.insert(10, 10).expect("c");

    assert_eq!(a, (Rect::new(0, 0, 10, 10), false));
    assert_eq!(b, (Rect::new(12, 0, 10, 10), false));
    assert_eq!(c, (Rect::new(24, 0, 10, 10), false));
    // trailing padding after the last sprite is not counted
    assert_eq!(p.used(), (34, 10));
}

#[test]
fn wide_sprite_rotates_when_only_rotated_fits_row() {
    let cfg = PackerConfig::builder().padding(2).allow_rotation(true).build();
    let mut p = ShelfPacker::new(&cfg, 30);

    let f = <ShelfPacker as Packer<String>>::pack(&mut p, "wide".into(), &Rect::new(0, 0, 50, 20))
        .expect("rotated fit should succeed");
    assert!(f.rotated);
    assert_eq!(f.frame, Rect::new(0, 0, 20, 50));
    assert_eq!(f.source_size, (50, 20));
}

#[test]
fn tall_sprites_lie_flat_with_rotation() {
    let cfg = PackerConfig::builder().padding(0).allow_rotation(true).build();
    let mut p = ShelfPacker::new(&cfg, 100);

    let (r, rotated) = p.insert(10, 30).expect("fits");
    assert!(rotated);
    assert_eq!((r.w, r.h), (30, 10));

    // squares and wide sprites keep their orientation
    let (r, rotated) = p.insert(12, 12).expect("fits");
    assert!(!rotated);
    assert_eq!((r.x, r.w, r.h), (30, 12, 12));
}

#[test]
fn no_rotation_when_disabled() {
    let cfg = PackerConfig::builder().padding(0).allow_rotation(false).build();
    let mut p = ShelfPacker::new(&cfg, 30);
    // wider than the row, but there is nothing to wrap from
    let (r, rotated) = p.insert(50, 20).expect("fits within max width");
    assert!(!rotated);
    assert_eq!(r, Rect::new(0, 0, 50, 20));

    let res = pack_layout(
        vec![("a", 8, 40), ("b", 5, 25), ("c", 3, 9)],
        PackerConfig::builder().allow_rotation(false).build(),
    )
    .expect("pack");
    assert!(res.placements.iter().all(|p| !p.rotated));
}

#[test]
fn wraps_to_next_row_with_padding() {
    let cfg = PackerConfig::builder().padding(2).build();
    let mut p = ShelfPacker::new(&cfg, 30);

    assert_eq!(p.insert(10, 10).map(|r| r.0), Some(Rect::new(0, 0, 10, 10)));
    assert_eq!(p.insert(10, 8).map(|r| r.0), Some(Rect::new(12, 0, 10, 8)));
    // 24 + 10 > 30
    assert_eq!(p.insert(10, 6).map(|r| r.0), Some(Rect::new(0, 12, 10, 6)));
    assert_eq!(p.insert(4, 4).map(|r| r.0), Some(Rect::new(12, 12, 4, 4)));
    assert_eq!(p.used(), (22, 18));
}

#[test]
fn bin_width_is_clamped_to_max_width() {
    let cfg = PackerConfig::builder().with_max_dimensions(64, 64).build();
    let p = ShelfPacker::new(&cfg, 500);
    assert_eq!(p.bin_width(), 64);
}

#[test]
fn rejects_sprite_past_max_height_without_moving_cursor() {
    let cfg = PackerConfig::builder()
        .with_max_dimensions(64, 20)
        .padding(2)
        .build();
    let mut p = ShelfPacker::new(&cfg, 34);
    assert!(p.insert(30, 10).is_some());
    let r = Rect::new(0, 0, 30, 10);
    // next row would start at y = 12 and end at 22 > 20
    assert!(!<ShelfPacker as Packer<String>>::can_pack(&p, &r));
    assert!(p.insert(30, 10).is_none());
    assert_eq!(p.used(), (30, 10));
    // a sprite that still fits in the current row is unaffected by the failure
    assert_eq!(p.insert(2, 2).map(|r| r.0), Some(Rect::new(32, 0, 2, 2)));
}

#[test]
fn pipeline_reports_max_height_overflow() {
    let cfg = PackerConfig::builder()
        .with_max_dimensions(64, 20)
        .padding(2)
        .build();
    let err = pack_layout(vec![("a", 30, 10), ("b", 30, 10), ("c", 30, 10)], cfg)
        .expect_err("third row cannot fit");
    match err {
        AtlasPackerError::PlacementFailure {
            key,
            width,
            height,
            max_width,
            max_height,
        } => {
            assert_eq!(key, "b");
            assert_eq!((width, height), (30, 10));
            assert_eq!((max_width, max_height), (64, 20));
        }
        other => panic!("expected PlacementFailure, got {other:?}"),
    }
}

#[test]
fn pipeline_layout_of_three_squares() {
    let cfg = PackerConfig::builder()
        .with_max_dimensions(100, 100)
        .padding(2)
        .build();
    let res = pack_layout(vec![("c", 10, 10), ("a", 10, 10), ("b", 10, 10)], cfg).expect("pack");
    // estimate: 3 * 12 * 12 = 432 -> 21 wide, so the third square wraps
    assert_eq!(res.get("a").map(|p| p.frame), Some(Rect::new(0, 0, 10, 10)));
    assert_eq!(res.get("b").map(|p| p.frame), Some(Rect::new(0, 12, 10, 10)));
    assert_eq!(res.get("c").map(|p| p.frame), Some(Rect::new(0, 24, 10, 10)));
    assert_eq!((res.width, res.height), (10, 34));
}
