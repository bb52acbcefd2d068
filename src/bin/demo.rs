//! Renders a full advance/retreat sequence of the step indicator to PNG
//! frames. Usage: stepcircle-demo <font.ttf> [out-dir]

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use stepcircle::{theme, PixmapRenderer, StepConfig, StepIndicator};

const WIDTH: u32 = 800;
const HEIGHT: u32 = 160;
const FRAME_MS: f32 = 1000.0 / 30.0;

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut args = std::env::args().skip(1);
    let font_path = args
        .next()
        .context("usage: stepcircle-demo <font.ttf> [out-dir]")?;
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "frames".into()));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("create {}", out_dir.display()))?;

    let font_data =
        std::fs::read(&font_path).with_context(|| format!("read font {font_path}"))?;
    let mut renderer = PixmapRenderer::new(WIDTH, HEIGHT, &font_data)?;

    let config = StepConfig {
        step_count: 4,
        show_labels: true,
        labels: Some(
            ["Account", "Shipping", "Payment", "Review"]
                .map(String::from)
                .to_vec(),
        ),
        ..StepConfig::default()
    };
    let mut widget = StepIndicator::new(config)?;
    widget.on_resize(WIDTH as f32, HEIGHT as f32);
    widget.add_step_click_listener(|step| info!(step, "step clicked"));

    let mut frame = 0usize;
    let mut save = |widget: &StepIndicator, renderer: &mut PixmapRenderer| -> Result<()> {
        renderer.clear(theme::BG);
        widget.draw(renderer);
        let path = out_dir.join(format!("frame_{frame:04}.png"));
        renderer.save_png(&path)?;
        frame += 1;
        Ok(())
    };

    // Walk forward through every step, then all the way back.
    let script: Vec<usize> = (1..4).chain((0..3).rev()).collect();
    for step in script {
        let transition = widget.request_step(step)?;
        info!(step, ?transition, "transition start");
        save(&widget, &mut renderer)?;
        while widget.tick(FRAME_MS) {
            save(&widget, &mut renderer)?;
        }
    }

    info!(frames = frame, dir = %out_dir.display(), "done");
    Ok(())
}
