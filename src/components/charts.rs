//! Chart Components
//!
//! Emotion distribution (doughnut) and per-hour stacked bars, drawn on
//! HTML5 Canvas. Each chart rebuilds its data wholesale on every update;
//! nothing is patched incrementally.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::emotions::{color_for, sort_labels};
use crate::state::global::{AppState, EmotionBucket, HourlyBreakdown};
use std::collections::HashMap;

const CHART_BG: &str = "#1f2937"; // gray-800
const GRID_COLOR: &str = "#374151"; // gray-700
const LABEL_COLOR: &str = "#9ca3af"; // gray-400
const EMPTY_COLOR: &str = "#6b7280"; // gray-500

/// One doughnut segment.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub label: String,
    pub value: u64,
    pub color: &'static str,
}

/// One stacked-bar series: a count for each hour of the day.
#[derive(Clone, Debug, PartialEq)]
pub struct HourlySeries {
    pub label: String,
    pub color: &'static str,
    pub counts: [u64; 24],
}

/// Build doughnut segments from a snapshot's per-label buckets.
///
/// Segments follow the fixed category order so that colors and legend
/// placement are stable across updates.
pub fn distribution_segments(emotions: &HashMap<String, EmotionBucket>) -> Vec<Segment> {
    let mut labels: Vec<String> = emotions.keys().cloned().collect();
    sort_labels(&mut labels);

    labels
        .into_iter()
        .map(|label| {
            let value = emotions.get(&label).map(|b| b.count).unwrap_or(0);
            let color = color_for(&label);
            Segment { label, value, color }
        })
        .collect()
}

/// Build one series per distinct label observed across the hourly map.
///
/// Labels absent from the latest fetch disappear; hours missing a label
/// stay zero. Hour keys outside "0".."23" are ignored.
pub fn hourly_series(hourly: &HourlyBreakdown) -> Vec<HourlySeries> {
    let mut labels: Vec<String> = hourly
        .values()
        .flat_map(|counts| counts.keys().cloned())
        .collect();
    labels.sort();
    labels.dedup();
    sort_labels(&mut labels);

    labels
        .into_iter()
        .map(|label| {
            let mut counts = [0u64; 24];
            for (hour, per_label) in hourly {
                if let Ok(h) = hour.parse::<usize>() {
                    if h < 24 {
                        counts[h] = per_label.get(&label).copied().unwrap_or(0);
                    }
                }
            }
            let color = color_for(&label);
            HourlySeries { label, color, counts }
        })
        .collect()
}

/// Emotion distribution doughnut chart
#[component]
pub fn DistributionChart() -> impl IntoView {
    let state = use_context::<AppState>().expect("AppState not found");
    let canvas_ref = create_node_ref::<html::Canvas>();

    let segments = create_memo(move |_| {
        state
            .stats
            .get()
            .map(|s| distribution_segments(&s.emotions))
            .unwrap_or_default()
    });

    create_effect(move |_| {
        let segments = segments.get();
        if let Some(canvas) = canvas_ref.get() {
            draw_distribution(&canvas, &segments);
        }
    });

    view! {
        <section class="bg-gray-800 rounded-xl p-6">
            <h2 class="text-xl font-semibold mb-4">"Emotion Distribution"</h2>
            <canvas
                node_ref=canvas_ref
                width="360"
                height="360"
                class="w-full max-w-sm mx-auto"
            />
            <ChartLegend labels=Signal::derive(move || {
                segments.get().into_iter().map(|s| (s.label, s.color)).collect::<Vec<_>>()
            }) />
        </section>
    }
}

/// Hourly stacked bar chart
#[component]
pub fn HourlyChart() -> impl IntoView {
    let state = use_context::<AppState>().expect("AppState not found");
    let canvas_ref = create_node_ref::<html::Canvas>();

    let series = create_memo(move |_| hourly_series(&state.hourly.get()));

    create_effect(move |_| {
        let series = series.get();
        if let Some(canvas) = canvas_ref.get() {
            draw_hourly(&canvas, &series);
        }
    });

    view! {
        <section class="bg-gray-800 rounded-xl p-6">
            <h2 class="text-xl font-semibold mb-4">"Detections by Hour"</h2>
            <canvas
                node_ref=canvas_ref
                width="800"
                height="300"
                class="w-full"
            />
            <ChartLegend labels=Signal::derive(move || {
                series.get().into_iter().map(|s| (s.label, s.color)).collect::<Vec<_>>()
            }) />
        </section>
    }
}

/// Legend row showing label colors
#[component]
fn ChartLegend(labels: Signal<Vec<(String, &'static str)>>) -> impl IntoView {
    view! {
        <div class="flex justify-center flex-wrap gap-4 mt-4">
            {move || {
                labels.get()
                    .into_iter()
                    .map(|(label, color)| {
                        view! {
                            <div class="flex items-center space-x-2">
                                <div
                                    class="w-3 h-3 rounded-full"
                                    style=format!("background-color: {}", color)
                                />
                                <span class="text-sm text-gray-300">{label}</span>
                            </div>
                        }
                    })
                    .collect::<Vec<_>>()
            }}
        </div>
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
}

/// Draw the distribution doughnut.
fn draw_distribution(canvas: &HtmlCanvasElement, segments: &[Segment]) {
    let Some(ctx) = context_2d(canvas) else {
        return;
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    ctx.set_fill_style_str(CHART_BG);
    ctx.fill_rect(0.0, 0.0, width, height);

    let total: u64 = segments.iter().map(|s| s.value).sum();
    if total == 0 {
        ctx.set_fill_style_str(EMPTY_COLOR);
        ctx.set_font("16px sans-serif");
        let _ = ctx.fill_text("No detections yet", width / 2.0 - 65.0, height / 2.0);
        return;
    }

    let cx = width / 2.0;
    let cy = height / 2.0;
    let radius = width.min(height) / 2.0 - 10.0;

    // Segments, clockwise from 12 o'clock
    let mut start = -std::f64::consts::FRAC_PI_2;
    for segment in segments {
        if segment.value == 0 {
            continue;
        }
        let sweep = segment.value as f64 / total as f64 * std::f64::consts::TAU;

        ctx.set_fill_style_str(segment.color);
        ctx.begin_path();
        ctx.move_to(cx, cy);
        let _ = ctx.arc(cx, cy, radius, start, start + sweep);
        ctx.close_path();
        ctx.fill();

        start += sweep;
    }

    // Punch the hole for the doughnut
    ctx.set_fill_style_str(CHART_BG);
    ctx.begin_path();
    let _ = ctx.arc(cx, cy, radius * 0.55, 0.0, std::f64::consts::TAU);
    ctx.fill();

    // Total in the center
    ctx.set_fill_style_str("#f9fafb");
    ctx.set_font("bold 24px sans-serif");
    ctx.set_text_align("center");
    let _ = ctx.fill_text(&total.to_string(), cx, cy + 8.0);
    ctx.set_text_align("start");
}

/// Draw the stacked per-hour bars.
fn draw_hourly(canvas: &HtmlCanvasElement, series: &[HourlySeries]) {
    let Some(ctx) = context_2d(canvas) else {
        return;
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    let margin_left = 40.0;
    let margin_right = 10.0;
    let margin_top = 10.0;
    let margin_bottom = 30.0;

    let chart_width = width - margin_left - margin_right;
    let chart_height = height - margin_top - margin_bottom;

    ctx.set_fill_style_str(CHART_BG);
    ctx.fill_rect(0.0, 0.0, width, height);

    let max_stack = (0..24)
        .map(|h| series.iter().map(|s| s.counts[h]).sum::<u64>())
        .max()
        .unwrap_or(0);

    if max_stack == 0 {
        ctx.set_fill_style_str(EMPTY_COLOR);
        ctx.set_font("16px sans-serif");
        let _ = ctx.fill_text("No hourly data", width / 2.0 - 55.0, height / 2.0);
        return;
    }

    // Horizontal grid lines with y-axis labels
    ctx.set_stroke_style_str(GRID_COLOR);
    ctx.set_line_width(1.0);
    for i in 0..=4 {
        let y = margin_top + (i as f64 / 4.0) * chart_height;
        ctx.begin_path();
        ctx.move_to(margin_left, y);
        ctx.line_to(width - margin_right, y);
        ctx.stroke();

        let value = max_stack as f64 * (1.0 - i as f64 / 4.0);
        ctx.set_fill_style_str(LABEL_COLOR);
        ctx.set_font("11px sans-serif");
        let _ = ctx.fill_text(&format!("{:.0}", value), 5.0, y + 4.0);
    }

    // One stacked column per hour
    let slot = chart_width / 24.0;
    let bar_width = slot * 0.7;

    for hour in 0..24 {
        let x = margin_left + hour as f64 * slot + (slot - bar_width) / 2.0;
        let mut stacked = 0.0;

        for s in series {
            let count = s.counts[hour];
            if count == 0 {
                continue;
            }
            let bar_height = count as f64 / max_stack as f64 * chart_height;
            let y = margin_top + chart_height - stacked - bar_height;

            ctx.set_fill_style_str(s.color);
            ctx.fill_rect(x, y, bar_width, bar_height);
            stacked += bar_height;
        }
    }

    // Hour labels every 4 hours
    ctx.set_fill_style_str(LABEL_COLOR);
    ctx.set_font("11px sans-serif");
    for hour in (0..24).step_by(4) {
        let x = margin_left + hour as f64 * slot;
        let _ = ctx.fill_text(&format!("{}:00", hour), x, height - 10.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(count: u64, avg_confidence: f64) -> EmotionBucket {
        EmotionBucket {
            count,
            avg_confidence,
        }
    }

    #[test]
    fn test_distribution_segments_ordered_and_colored() {
        let mut emotions = HashMap::new();
        emotions.insert("Neutral".to_string(), bucket(3, 0.6));
        emotions.insert("Enojo".to_string(), bucket(1, 0.8));
        emotions.insert("Desconocida".to_string(), bucket(2, 0.5));

        let segments = distribution_segments(&emotions);

        let labels: Vec<&str> = segments.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Enojo", "Neutral", "Desconocida"]);
        assert_eq!(segments[0].color, "#ef4444");
        // Unknown labels take the fallback color
        assert_eq!(segments[2].color, "#6b7280");
        assert_eq!(segments[1].value, 3);
    }

    #[test]
    fn test_hourly_series_two_labels_disjoint_hours() {
        let mut hourly: HourlyBreakdown = HashMap::new();
        hourly.insert(
            "9".to_string(),
            HashMap::from([("Felicidad".to_string(), 4u64)]),
        );
        hourly.insert(
            "15".to_string(),
            HashMap::from([("Tristeza".to_string(), 2u64)]),
        );

        let series = hourly_series(&hourly);

        assert_eq!(series.len(), 2);
        for s in &series {
            assert_eq!(s.counts.len(), 24);
        }

        let felicidad = series.iter().find(|s| s.label == "Felicidad").unwrap();
        assert_eq!(felicidad.counts[9], 4);
        assert_eq!(felicidad.counts.iter().sum::<u64>(), 4);

        let tristeza = series.iter().find(|s| s.label == "Tristeza").unwrap();
        assert_eq!(tristeza.counts[15], 2);
        assert_eq!(tristeza.counts.iter().sum::<u64>(), 2);
    }

    #[test]
    fn test_hourly_series_deterministic_order() {
        let mut hourly: HourlyBreakdown = HashMap::new();
        hourly.insert(
            "3".to_string(),
            HashMap::from([
                ("Sorpresa".to_string(), 1u64),
                ("Enojo".to_string(), 1u64),
            ]),
        );

        let series = hourly_series(&hourly);
        let labels: Vec<&str> = series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Enojo", "Sorpresa"]);
    }

    #[test]
    fn test_hourly_series_ignores_out_of_range_hours() {
        let mut hourly: HourlyBreakdown = HashMap::new();
        hourly.insert(
            "24".to_string(),
            HashMap::from([("Neutral".to_string(), 9u64)]),
        );
        hourly.insert(
            "banana".to_string(),
            HashMap::from([("Neutral".to_string(), 9u64)]),
        );
        hourly.insert(
            "0".to_string(),
            HashMap::from([("Neutral".to_string(), 1u64)]),
        );

        let series = hourly_series(&hourly);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].counts[0], 1);
        assert_eq!(series[0].counts.iter().sum::<u64>(), 1);
    }

    #[test]
    fn test_hourly_series_empty_map() {
        assert!(hourly_series(&HashMap::new()).is_empty());
    }
}
