use super::*;

fn opaque_surface(width: u32, height: u32, px: [u8; 4]) -> Surface {
    let mut s = Surface::new(Size { width, height }, u64::MAX).unwrap();
    for chunk in s.data_mut().chunks_exact_mut(4) {
        chunk.copy_from_slice(&px);
    }
    s
}

fn white_dot() -> Layer {
    Layer {
        x: 4,
        y: 4,
        width: 1,
        height: 1,
        data: vec![255, 255, 255, 255],
    }
}

#[test]
fn alloc_rejects_zero_and_oversized_surfaces() {
    assert!(matches!(
        alloc_rgba8(Size { width: 0, height: 4 }, u64::MAX),
        Err(MediaError::Composition(_))
    ));
    assert!(matches!(
        alloc_rgba8(Size { width: 100, height: 100 }, 9_999),
        Err(MediaError::Composition(_))
    ));
    assert_eq!(
        alloc_rgba8(Size { width: 2, height: 3 }, u64::MAX)
            .unwrap()
            .len(),
        24
    );
}

#[test]
fn scoped_state_is_restored_after_draw() {
    let mut s = opaque_surface(9, 9, [0, 0, 0, 255]);
    s.scoped(|s| {
        s.set_opacity(0.25);
        s.set_shadow(Some(ShadowStyle::SOFT));
        assert_eq!(s.save_depth(), 1);
        s.draw_layer(&white_dot())
    })
    .unwrap();
    assert_eq!(s.state(), DrawState::default());
    assert_eq!(s.save_depth(), 0);
}

#[test]
fn scoped_state_is_restored_on_error() {
    let mut s = opaque_surface(4, 4, [0, 0, 0, 255]);
    let bad = Layer {
        x: 0,
        y: 0,
        width: 2,
        height: 2,
        data: vec![0; 3],
    };
    let res = s.scoped(|s| {
        s.set_opacity(0.5);
        s.draw_layer(&bad)
    });
    assert!(res.is_err());
    assert_eq!(s.state(), DrawState::default());
}

#[test]
fn draw_after_scope_does_not_inherit_opacity_or_shadow() {
    let mut a = opaque_surface(9, 9, [0, 0, 0, 255]);
    a.scoped(|s| {
        s.set_opacity(0.3);
        s.set_shadow(Some(ShadowStyle::SOFT));
        Ok(())
    })
    .unwrap();
    a.draw_layer(&white_dot()).unwrap();

    let mut b = opaque_surface(9, 9, [0, 0, 0, 255]);
    b.draw_layer(&white_dot()).unwrap();

    assert_eq!(a.data(), b.data());
    let center = (4 * 9 + 4) * 4;
    assert_eq!(&a.data()[center..center + 4], &[255, 255, 255, 255]);
}

#[test]
fn shadow_darkens_pixels_near_the_offset() {
    let mut with_shadow = opaque_surface(16, 16, [200, 200, 200, 255]);
    with_shadow
        .scoped(|s| {
            s.set_shadow(Some(ShadowStyle::SOFT));
            s.draw_layer(&Layer {
                x: 6,
                y: 6,
                width: 2,
                height: 2,
                data: [255u8, 255, 255, 255].repeat(4),
            })
        })
        .unwrap();

    let below_right = ((9 * 16) + 9) * 4;
    assert!(with_shadow.data()[below_right] < 200);
    let far_corner = 0;
    assert_eq!(with_shadow.data()[far_corner], 200);
}

#[test]
fn layers_are_clipped_to_surface_bounds() {
    let mut s = opaque_surface(2, 2, [0, 0, 0, 255]);
    s.draw_layer(&Layer {
        x: -1,
        y: 1,
        width: 2,
        height: 2,
        data: [255u8, 0, 0, 255].repeat(4),
    })
    .unwrap();
    assert_eq!(&s.data()[8..12], &[255, 0, 0, 255]);
    assert_eq!(&s.data()[12..16], &[0, 0, 0, 255]);
    assert_eq!(&s.data()[0..4], &[0, 0, 0, 255]);
}

#[test]
fn zero_opacity_draws_nothing() {
    let mut s = opaque_surface(9, 9, [0, 0, 0, 255]);
    let before = s.data().to_vec();
    s.scoped(|s| {
        s.set_opacity(0.0);
        s.draw_layer(&white_dot())
    })
    .unwrap();
    assert_eq!(s.data(), before.as_slice());
}
