//! Integer alpha compositing on straight-alpha RGBA8 pixels

use crate::types::Rgb;

/// `a * b / 255`, rounded
#[inline]
pub fn mul_div255(a: u8, b: u8) -> u8 {
    ((a as u32 * b as u32 + 127) / 255) as u8
}

/// Porter-Duff source-over of `src` (alpha scaled by `coverage`) onto `dst`.
///
/// Both pixels are straight alpha; the result is straight alpha.
#[inline]
pub fn source_over(dst: [u8; 4], src: [u8; 4], coverage: u8) -> [u8; 4] {
    let sa = mul_div255(src[3], coverage) as u32;
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return [src[0], src[1], src[2], 255];
    }

    // Channel weights in 255*255 scale: out_a * 255 = sa * 255 + da * (255 - sa)
    let src_weight = sa * 255;
    let dst_weight = dst[3] as u32 * (255 - sa);
    let total = src_weight + dst_weight;

    let channel = |s: u8, d: u8| {
        ((s as u32 * src_weight + d as u32 * dst_weight + total / 2) / total) as u8
    };

    [
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        ((total + 127) / 255) as u8,
    ]
}

/// Source-over of `src` onto an opaque background; the result is always opaque.
#[inline]
pub fn over_opaque(background: Rgb, src: [u8; 4]) -> [u8; 4] {
    let sa = src[3] as u32;
    let channel = |s: u8, b: u8| ((s as u32 * sa + b as u32 * (255 - sa) + 127) / 255) as u8;
    [
        channel(src[0], background.r),
        channel(src[1], background.g),
        channel(src[2], background.b),
        255,
    ]
}

/// Destination-out: remove `amount` (0-255) of the pixel's alpha.
#[inline]
pub fn destination_out(dst: [u8; 4], amount: u8) -> [u8; 4] {
    let alpha = mul_div255(dst[3], 255 - amount);
    if alpha == 0 {
        return [0, 0, 0, 0];
    }
    [dst[0], dst[1], dst[2], alpha]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_over_onto_transparent() {
        let out = source_over([0, 0, 0, 0], [200, 100, 50, 128], 255);
        // Color stays straight, alpha is the source alpha
        assert_eq!(out, [200, 100, 50, 128]);
    }

    #[test]
    fn test_source_over_zero_coverage_is_noop() {
        let dst = [1, 2, 3, 4];
        assert_eq!(source_over(dst, [255, 255, 255, 255], 0), dst);
    }

    #[test]
    fn test_over_opaque_is_not_additive() {
        let bg = Rgb::new(200, 200, 200);
        // Half-transparent white over light gray must not exceed white
        let out = over_opaque(bg, [255, 255, 255, 128]);
        assert_eq!(out[3], 255);
        assert!(out[0] >= 200);
        assert_eq!(over_opaque(bg, [0, 0, 0, 0]), [200, 200, 200, 255]);
        assert_eq!(over_opaque(bg, [9, 8, 7, 255]), [9, 8, 7, 255]);
    }

    #[test]
    fn test_destination_out() {
        assert_eq!(destination_out([10, 10, 10, 255], 255), [0, 0, 0, 0]);
        let half = destination_out([10, 10, 10, 255], 128);
        assert_eq!(half[..3], [10, 10, 10]);
        assert_eq!(half[3], 127);
    }
}
