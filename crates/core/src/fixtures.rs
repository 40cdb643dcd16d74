//! # テスト用画像フィクスチャ
//!
//! `test-support` フィーチャーで他クレートのテストからも利用できる。
//! 画像はすべてその場で生成するため、リポジトリにバイナリを置かない。

use image::codecs::gif::{GifEncoder, Repeat};
use image::codecs::jpeg::JpegEncoder;
use image::{Delay, Frame, Rgb, RgbImage, Rgba, RgbaImage};

/// GIFフィクスチャの一辺（ピクセル）
pub const GIF_FIXTURE_SIZE: u32 = 8;

/// JPEGフィクスチャの幅。左半分が赤、右半分が青。
pub const JPEG_FIXTURE_WIDTH: u32 = 64;

/// JPEGフィクスチャの高さ
pub const JPEG_FIXTURE_HEIGHT: u32 = 32;

/// フィクスチャのループ回数（正規化で無限ループに書き換わることを確認するため有限にする）
const FIXTURE_LOOP_COUNT: u16 = 2;

const PALETTE: [[u8; 3]; 6] = [
    [255, 0, 0],
    [0, 255, 0],
    [0, 0, 255],
    [255, 255, 0],
    [0, 255, 255],
    [255, 0, 255],
];

/// 市松模様のフレーム列を生成する。フレームごとに色が異なる。
pub fn gif_frames(count: usize) -> Vec<RgbaImage> {
    (0..count)
        .map(|i| {
            let [r, g, b] = PALETTE[i % PALETTE.len()];
            RgbaImage::from_fn(GIF_FIXTURE_SIZE, GIF_FIXTURE_SIZE, |x, y| {
                if (x + y + i as u32) % 2 == 0 {
                    Rgba([r, g, b, 255])
                } else {
                    Rgba([0, 0, 0, 255])
                }
            })
        })
        .collect()
}

fn encode_gif(frames: Vec<RgbaImage>, delay_ms: u32, repeat: Option<Repeat>) -> Vec<u8> {
    let delay = Delay::from_numer_denom_ms(delay_ms, 1);
    let mut out = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut out);
        if let Some(repeat) = repeat {
            encoder.set_repeat(repeat).expect("ループ設定に失敗");
        }
        encoder
            .encode_frames(frames.into_iter().map(|f| Frame::from_parts(f, 0, 0, delay)))
            .expect("GIFエンコードに失敗");
    }
    out
}

/// 指定フレーム数・ディレイのアニメーションGIF（ループ回数は有限）。
pub fn animated_gif(frame_count: usize, delay_ms: u32) -> Vec<u8> {
    encode_gif(
        gif_frames(frame_count),
        delay_ms,
        Some(Repeat::Finite(FIXTURE_LOOP_COUNT)),
    )
}

/// 1フレームだけの静止GIF。
pub fn static_gif() -> Vec<u8> {
    encode_gif(gif_frames(1), 100, None)
}

/// EXIF Orientationタグだけを持つAPP1セグメントを組み立てる（ビッグエンディアンTIFF）。
fn exif_orientation_segment(orientation: u16) -> Vec<u8> {
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM\x00\x2a");
    tiff.extend_from_slice(&8u32.to_be_bytes());
    tiff.extend_from_slice(&1u16.to_be_bytes());
    // tag=Orientation, type=SHORT, count=1, value
    tiff.extend_from_slice(&0x0112u16.to_be_bytes());
    tiff.extend_from_slice(&3u16.to_be_bytes());
    tiff.extend_from_slice(&1u32.to_be_bytes());
    tiff.extend_from_slice(&orientation.to_be_bytes());
    tiff.extend_from_slice(&[0, 0]);
    tiff.extend_from_slice(&0u32.to_be_bytes());

    let mut payload = b"Exif\x00\x00".to_vec();
    payload.extend_from_slice(&tiff);

    let length = u16::try_from(payload.len() + 2).expect("APP1セグメントが長すぎます");
    let mut segment = vec![0xFF, 0xE1];
    segment.extend_from_slice(&length.to_be_bytes());
    segment.extend_from_slice(&payload);
    segment
}

/// 左半分が赤・右半分が青のJPEGに、指定したEXIF Orientationを埋め込む。
pub fn jpeg_with_orientation(orientation: u16) -> Vec<u8> {
    let image = RgbImage::from_fn(JPEG_FIXTURE_WIDTH, JPEG_FIXTURE_HEIGHT, |x, _| {
        if x < JPEG_FIXTURE_WIDTH / 2 {
            Rgb([255, 0, 0])
        } else {
            Rgb([0, 0, 255])
        }
    });

    let mut encoded = Vec::new();
    JpegEncoder::new_with_quality(&mut encoded, 95)
        .encode_image(&image)
        .expect("JPEGエンコードに失敗");

    // SOIの直後にAPP1を差し込む
    let mut out = encoded[..2].to_vec();
    out.extend_from_slice(&exif_orientation_segment(orientation));
    out.extend_from_slice(&encoded[2..]);
    out
}

/// バイト列にEXIFヘッダが含まれるか。
pub fn contains_exif(data: &[u8]) -> bool {
    data.windows(6).any(|w| w == b"Exif\x00\x00")
}

/// NETSCAPE2.0拡張からループ回数を読む。0は無限ループ。拡張が無ければ `None`。
pub fn gif_loop_count(data: &[u8]) -> Option<u16> {
    const MARKER: &[u8] = b"NETSCAPE2.0";
    let start = data.windows(MARKER.len()).position(|w| w == MARKER)? + MARKER.len();
    match data.get(start..start + 4)? {
        [0x03, 0x01, lo, hi] => Some(u16::from_le_bytes([*lo, *hi])),
        _ => None,
    }
}
