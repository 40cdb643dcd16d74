//! # 画像の正規化
//!
//! - GIF: 全フレームを独立したRGBAバッファに複製し、
//!   ディレイを固定値に揃えて無限ループで再エンコードする
//! - JPEG: EXIF Orientationを画素に適用し、タグを含まない形で再エンコードする

use std::io::Cursor;

use image::codecs::gif::{GifDecoder, GifEncoder, Repeat};
use image::codecs::jpeg::{JpegDecoder, JpegEncoder};
use image::{AnimationDecoder, Delay, DynamicImage, Frame, ImageDecoder, Limits};

use crate::{CoreError, StaticGifPolicy};

/// 全フレームに設定する表示時間（ミリ秒）。元のディレイは捨てる。
/// GIFは10ms単位で保持するため、ファイル上は6センチ秒になる。
pub const FRAME_DELAY_MS: u32 = 66;

/// 再エンコード時のJPEG品質
pub const JPEG_QUALITY: u8 = 75;

/// 256色を超えるフレームを減色する際の速度（1〜30、小さいほど高品質）。
/// 256色以下のフレームは減色されず元の色がそのまま残る。
const GIF_QUANTIZE_SPEED: i32 = 10;

/// GIFキャンバスの一辺の上限（ピクセル）
const MAX_GIF_DIMENSION: u32 = 16_384;

/// デコード後の全フレームの合計サイズの上限（バイト）。
/// 各フレームはキャンバス全体のRGBAバッファとして展開される。
pub const MAX_DECODED_GIF_BYTES: u64 = 512 * 1024 * 1024;

fn decode_err(e: image::ImageError) -> CoreError {
    CoreError::Decode(e.to_string())
}

fn encode_err(e: image::ImageError) -> CoreError {
    CoreError::Encode(e.to_string())
}

/// GIFを正規化する。
///
/// フレームが1枚以下の場合はポリシーに従う。`Drop` では `Ok(None)` を返し、
/// 呼び出し側は何も保存しない。
pub fn normalize_gif(data: &[u8], policy: StaticGifPolicy) -> Result<Option<Vec<u8>>, CoreError> {
    let frames = decode_gif_frames(data, MAX_DECODED_GIF_BYTES)?;

    if frames.len() < 2 {
        match policy {
            StaticGifPolicy::Drop => return Ok(None),
            StaticGifPolicy::Reject => return Err(CoreError::NotAnimated),
            StaticGifPolicy::Store if frames.is_empty() => {
                return Err(CoreError::Decode("GIFにフレームがありません".to_string()));
            }
            StaticGifPolicy::Store => {}
        }
    }

    let delay = Delay::from_numer_denom_ms(FRAME_DELAY_MS, 1);
    let retimed = frames.into_iter().map(|frame| {
        let (left, top) = (frame.left(), frame.top());
        Frame::from_parts(frame.into_buffer(), left, top, delay)
    });

    let mut out = Vec::new();
    {
        // エンコーダのdropでトレーラが書き込まれる
        let mut encoder = GifEncoder::new_with_speed(&mut out, GIF_QUANTIZE_SPEED);
        encoder.set_repeat(Repeat::Infinite).map_err(encode_err)?;
        encoder.encode_frames(retimed).map_err(encode_err)?;
    }

    Ok(Some(out))
}

/// GIFの全フレームをデコードする。
///
/// デコーダは合成済みのキャンバスをフレームごとに新しいバッファで返すため、
/// 小さなサブフレームを大量に並べた入力は展開後に何倍にも膨らむ。
/// 合計が `budget` を超えた時点で打ち切る。
fn decode_gif_frames(data: &[u8], budget: u64) -> Result<Vec<Frame>, CoreError> {
    let mut decoder = GifDecoder::new(Cursor::new(data)).map_err(decode_err)?;

    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_GIF_DIMENSION);
    limits.max_image_height = Some(MAX_GIF_DIMENSION);
    decoder.set_limits(limits).map_err(decode_err)?;

    let (width, height) = decoder.dimensions();
    let frame_bytes = u64::from(width) * u64::from(height) * 4;

    let mut frames = Vec::new();
    let mut total: u64 = 0;
    for frame in decoder.into_frames() {
        total = total.saturating_add(frame_bytes);
        if total > budget {
            return Err(CoreError::Decode(format!(
                "展開後のGIFが上限を超えます（{}フレーム目、上限{budget}バイト）",
                frames.len() + 1
            )));
        }
        frames.push(frame.map_err(decode_err)?);
    }

    Ok(frames)
}

/// JPEGを正規化する。
///
/// 出力にはEXIFセグメントを含めない。
pub fn normalize_jpeg(data: &[u8]) -> Result<Vec<u8>, CoreError> {
    let mut decoder = JpegDecoder::new(Cursor::new(data)).map_err(decode_err)?;
    let orientation = decoder.orientation().map_err(decode_err)?;

    let mut image = DynamicImage::from_decoder(decoder).map_err(decode_err)?;
    image.apply_orientation(orientation);

    // JPEGエンコーダはグレースケールと8bit RGBのみ扱う
    let image = match image {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => image,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    };

    let mut out = Vec::new();
    image
        .write_with_encoder(JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY))
        .map_err(encode_err)?;

    Ok(out)
}
