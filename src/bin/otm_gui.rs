//! OTM Flow GUI
//!
//! Prompts for a ticker on the terminal, runs the scan, then draws the four
//! chart panels in a window.

use std::io;

use anyhow::Context;
use eframe::egui;
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};
use tracing_subscriber::EnvFilter;

use otm_flow::prelude::*;

const VOLUME_COLOR: egui::Color32 = egui::Color32::from_rgb(100, 150, 220);
const OPEN_INTEREST_COLOR: egui::Color32 = egui::Color32::from_rgb(230, 160, 90);

struct OtmApp {
    charts: ChartDatasets,
}

impl OtmApp {
    fn new(charts: ChartDatasets) -> Self {
        Self { charts }
    }

    fn expiry_index(&self, expiry: chrono::NaiveDate) -> f64 {
        self.charts
            .expirations
            .iter()
            .position(|&e| e == expiry)
            .unwrap_or(0) as f64
    }

    /// Panel 1: open interest bars with call and put volume lines
    fn activity_panel(&self, ui: &mut egui::Ui, height: f32) {
        ui.strong("Volume and open interest by expiration");

        let points = &self.charts.series.points;
        let oi_bars: Vec<Bar> = points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                Bar::new(i as f64, p.open_interest as f64)
                    .name(p.expiry.to_string())
                    .width(0.6)
            })
            .collect();

        let calls: Vec<[f64; 2]> = points
            .iter()
            .enumerate()
            .map(|(i, p)| [i as f64, p.call_volume as f64])
            .collect();
        let puts: Vec<[f64; 2]> = points
            .iter()
            .enumerate()
            .map(|(i, p)| [i as f64, p.put_volume as f64])
            .collect();

        Plot::new("activity")
            .height(height)
            .legend(Legend::default())
            .x_axis_label("Expiration #")
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(
                    BarChart::new(oi_bars)
                        .name("Open Interest")
                        .color(egui::Color32::from_rgba_unmultiplied(200, 200, 200, 120)),
                );
                plot_ui.line(
                    Line::new(PlotPoints::new(calls.clone()))
                        .name("Net Call Volume")
                        .color(egui::Color32::LIGHT_GREEN)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::new(calls))
                        .color(egui::Color32::LIGHT_GREEN)
                        .radius(3.0),
                );
                plot_ui.line(
                    Line::new(PlotPoints::new(puts.clone()))
                        .name("Net Put Volume")
                        .color(egui::Color32::LIGHT_RED)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::new(puts))
                        .color(egui::Color32::LIGHT_RED)
                        .radius(3.0),
                );
            });

        let labels: Vec<String> = self
            .charts
            .expirations
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{}: {}", i, e))
            .collect();
        ui.small(labels.join("   "));
    }

    /// Panels 2 and 4: grouped volume / open interest bars per strike
    fn strike_bars_panel(
        &self,
        ui: &mut egui::Ui,
        id: &str,
        title: &str,
        bars: &[BarRow],
        height: f32,
    ) {
        ui.strong(title);

        let mut volume = Vec::new();
        let mut open_interest = Vec::new();
        let mut by_metric = [0usize; 2];

        for row in bars {
            let slot = match row.metric {
                Metric::Volume => 0,
                Metric::OpenInterest => 1,
            };
            let i = by_metric[slot] as f64;
            by_metric[slot] += 1;

            let offset = if slot == 0 { -0.2 } else { 0.2 };
            let bar = Bar::new(i + offset, row.value as f64)
                .name(format!("{:.2} {}", row.strike, row.metric.label()))
                .width(0.4);

            match row.metric {
                Metric::Volume => volume.push(bar),
                Metric::OpenInterest => open_interest.push(bar),
            }
        }

        Plot::new(id)
            .height(height)
            .legend(Legend::default())
            .x_axis_label("Rank (hover for strike)")
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(volume).name("volume").color(VOLUME_COLOR));
                plot_ui.bar_chart(
                    BarChart::new(open_interest)
                        .name("openInterest")
                        .color(OPEN_INTEREST_COLOR),
                );
            });
    }

    /// Panel 3: calls by expiration and strike, size and color by volume
    fn bubble_panel(&self, ui: &mut egui::Ui, height: f32) {
        ui.strong("Top OTM call volume");

        let max_volume = self
            .charts
            .bubbles
            .iter()
            .map(|b| b.volume)
            .max()
            .unwrap_or(0)
            .max(1) as f64;

        let spot = self.charts.spot;

        Plot::new("bubbles")
            .height(height)
            .x_axis_label("Expiration #")
            .y_axis_label("Strike")
            .show(ui, |plot_ui| {
                for b in &self.charts.bubbles {
                    let t = (b.volume as f64 / max_volume).sqrt();
                    let at = [self.expiry_index(b.expiry), b.strike];
                    plot_ui.points(
                        Points::new(PlotPoints::new(vec![at]))
                            .radius(3.0 + 17.0 * t as f32)
                            .color(coolwarm(t))
                            .name(format!("{} {:.2}: {}", b.expiry, b.strike, b.volume)),
                    );
                }
                plot_ui.line(
                    Line::new(PlotPoints::new(vec![
                        [-0.5, spot],
                        [self.charts.expirations.len() as f64 - 0.5, spot],
                    ]))
                    .name("Spot")
                    .color(egui::Color32::YELLOW)
                    .style(egui_plot::LineStyle::Dashed { length: 5.0 }),
                );
            });
    }
}

/// Blue for low values, red for high, `t` in [0, 1]
fn coolwarm(t: f64) -> egui::Color32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    egui::Color32::from_rgba_unmultiplied(
        lerp(59.0, 180.0),
        lerp(76.0, 4.0),
        lerp(192.0, 38.0),
        180,
    )
}

impl eframe::App for OtmApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("summary").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(self.charts.ticker.as_str());
                ui.separator();
                ui.label(format!("Spot: ${:.2}", self.charts.spot));
                ui.separator();
                ui.label(format!("Expirations: {}", self.charts.expirations.len()));
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let height = (ui.available_height() / 2.0 - 40.0).max(120.0);

            ui.columns(2, |cols| {
                self.activity_panel(&mut cols[0], height);
                self.bubble_panel(&mut cols[1], height);
            });
            ui.separator();
            ui.columns(2, |cols| {
                self.strike_bars_panel(
                    &mut cols[0],
                    "call_bars",
                    "Top OTM calls: volume and open interest",
                    &self.charts.call_bars,
                    height,
                );
                self.strike_bars_panel(
                    &mut cols[1],
                    "put_bars",
                    "Top OTM puts: volume and open interest",
                    &self.charts.put_bars,
                    height,
                );
            });
        });
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let ticker = prompt_ticker(&mut io::stdin().lock(), &mut io::stdout())?;

    let yahoo = CachedMarketData::new(YahooClient::new()?);
    let (_, charts) = run_scan(&yahoo, &ticker, &ScanConfig::default())
        .with_context(|| format!("scan of {} failed", ticker))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_title(format!("OTM Flow - {}", ticker)),
        ..Default::default()
    };

    eframe::run_native(
        "OTM Flow",
        options,
        Box::new(move |_cc| Box::new(OtmApp::new(charts))),
    )
    .map_err(|e| anyhow::anyhow!("window failed: {}", e))
}
