//! Video Panel
//!
//! Live video feed rendered onto a canvas from hex-encoded JPEG frames,
//! with the connection status pill and the current-emotion card.

use leptos::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, Url};

use crate::emotions::{color_for, confidence_percent, emoji_for};
use crate::state::{AppState, ChannelStatus};

/// Live video panel component
#[component]
pub fn VideoPanel() -> impl IntoView {
    let state = use_context::<AppState>().expect("AppState not found");
    let canvas_ref = create_node_ref::<html::Canvas>();

    // Repaint whenever a new frame arrives
    let frame_state = state.clone();
    create_effect(move |_| {
        if let Some(frame) = frame_state.current_frame.get() {
            if let Some(canvas) = canvas_ref.get() {
                draw_frame(&canvas, &frame);
            }
        }
    });

    let overlay_state = state.clone();

    view! {
        <section class="bg-gray-800 rounded-xl p-6">
            <div class="flex items-center justify-between mb-4">
                <h2 class="text-xl font-semibold">"Live Feed"</h2>
                <StatusPill />
            </div>

            <div class="relative">
                <canvas
                    node_ref=canvas_ref
                    width="640"
                    height="480"
                    class="w-full rounded-lg bg-black"
                />

                {move || {
                    if overlay_state.video_status.get() != ChannelStatus::Connected {
                        view! {
                            <div class="absolute inset-0 bg-gray-900/70 flex items-center justify-center rounded-lg">
                                <span class="text-gray-300">"Waiting for stream..."</span>
                            </div>
                        }.into_view()
                    } else {
                        view! {}.into_view()
                    }
                }}
            </div>

            <CurrentEmotion />
        </section>
    }
}

/// Video channel status indicator
#[component]
fn StatusPill() -> impl IntoView {
    let state = use_context::<AppState>().expect("AppState not found");

    view! {
        <span class="flex items-center space-x-2 text-sm">
            {move || {
                let (label, dot, text) = match state.video_status.get() {
                    ChannelStatus::Connecting => ("Connecting...", "bg-yellow-400", "text-yellow-400"),
                    ChannelStatus::Connected => ("Live", "bg-green-400 pulse", "text-green-400"),
                    ChannelStatus::Error => ("Error", "bg-red-400", "text-red-400"),
                    ChannelStatus::Reconnecting => ("Reconnecting...", "bg-yellow-400", "text-yellow-400"),
                };
                view! {
                    <span class=format!("flex items-center space-x-1 {}", text)>
                        <span class=format!("w-2 h-2 rounded-full {}", dot) />
                        <span>{label}</span>
                    </span>
                }
            }}
        </span>
    }
}

/// Current classification result card
#[component]
fn CurrentEmotion() -> impl IntoView {
    let state = use_context::<AppState>().expect("AppState not found");

    view! {
        <div class="mt-4 bg-gray-700 rounded-lg p-4">
            {move || {
                match state.current_emotion.get() {
                    Some(reading) => {
                        let percent = confidence_percent(reading.confidence);
                        let color = color_for(&reading.emotion);
                        view! {
                            <div class="flex items-center space-x-4">
                                <span class="text-5xl">{emoji_for(&reading.emotion)}</span>
                                <div class="flex-1">
                                    <div class="text-lg font-semibold">{reading.emotion.clone()}</div>
                                    <div class="h-2 bg-gray-600 rounded-full mt-2 overflow-hidden">
                                        <div
                                            class="h-full rounded-full transition-all"
                                            style=format!(
                                                "width: {}%; background: linear-gradient(90deg, {}, #519872)",
                                                percent, color
                                            )
                                        />
                                    </div>
                                    <div class="text-sm text-gray-400 mt-1">
                                        {format!("{}% confidence", percent)}
                                    </div>
                                </div>
                            </div>
                        }.into_view()
                    }
                    None => view! {
                        <p class="text-gray-400 text-sm">"No emotion detected yet"</p>
                    }.into_view(),
                }
            }}
        </div>
    }
}

/// Decode a hex string into bytes.
///
/// Returns None on odd length or any non-hex digit.
pub fn decode_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }

    let mut bytes = Vec::with_capacity(hex.len() / 2);
    for pair in hex.as_bytes().chunks(2) {
        let hi = (pair[0] as char).to_digit(16)?;
        let lo = (pair[1] as char).to_digit(16)?;
        bytes.push((hi << 4 | lo) as u8);
    }
    Some(bytes)
}

/// Paint one hex-encoded JPEG frame onto the canvas.
///
/// Best-effort: a failed decode leaves the previous frame visible and the
/// next frame self-corrects. The blob URL is revoked whether or not the
/// image loads.
pub fn draw_frame(canvas: &HtmlCanvasElement, hex_frame: &str) {
    let Some(bytes) = decode_hex(hex_frame) else {
        return;
    };
    let Ok(url) = jpeg_blob_url(&bytes) else {
        return;
    };
    let Ok(img) = HtmlImageElement::new() else {
        let _ = Url::revoke_object_url(&url);
        return;
    };

    let canvas = canvas.clone();
    let loaded_img = img.clone();
    let loaded_url = url.clone();
    let on_load = Closure::wrap(Box::new(move || {
        canvas.set_width(loaded_img.natural_width());
        canvas.set_height(loaded_img.natural_height());
        if let Ok(Some(ctx)) = canvas.get_context("2d") {
            if let Ok(ctx) = ctx.dyn_into::<CanvasRenderingContext2d>() {
                let _ = ctx.draw_image_with_html_image_element(&loaded_img, 0.0, 0.0);
            }
        }
        let _ = Url::revoke_object_url(&loaded_url);
    }) as Box<dyn FnMut()>);
    img.set_onload(Some(on_load.as_ref().unchecked_ref()));
    on_load.forget();

    let failed_url = url.clone();
    let on_error = Closure::wrap(Box::new(move || {
        let _ = Url::revoke_object_url(&failed_url);
    }) as Box<dyn FnMut()>);
    img.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    on_error.forget();

    img.set_src(&url);
}

/// Wrap JPEG bytes in a blob and hand back an object URL.
fn jpeg_blob_url(bytes: &[u8]) -> Result<String, JsValue> {
    let array = js_sys::Array::new();
    array.push(&js_sys::Uint8Array::from(bytes));

    let options = web_sys::BlobPropertyBag::new();
    options.set_type("image/jpeg");

    let blob = Blob::new_with_u8_array_sequence_and_options(&array, &options)?;
    Url::create_object_url_with_blob(&blob)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hex_valid() {
        // JPEG SOI marker plus two payload bytes
        assert_eq!(decode_hex("ffd8ffe0"), Some(vec![0xff, 0xd8, 0xff, 0xe0]));
        assert_eq!(decode_hex("00"), Some(vec![0x00]));
        assert_eq!(decode_hex(""), Some(vec![]));
    }

    #[test]
    fn test_decode_hex_mixed_case() {
        assert_eq!(decode_hex("FFd8Ab"), Some(vec![0xff, 0xd8, 0xab]));
    }

    #[test]
    fn test_decode_hex_odd_length() {
        assert_eq!(decode_hex("fff"), None);
    }

    #[test]
    fn test_decode_hex_non_hex_digit() {
        assert_eq!(decode_hex("zz00"), None);
        assert_eq!(decode_hex("ff 0"), None);
    }
}
