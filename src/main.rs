//! Desktop host for the portfolio backdrops
//!
//! Lays the black-hole tunnel over the whole window and the fireworks over a
//! footer band at the bottom, screened on top like the page's footer canvas.

use emberfield::config::{Config, HostConfig};
use emberfield::display::{
    BlendMode, Display, InputEvent, PixelBuffer, RenderTarget, DEFAULT_HEIGHT, DEFAULT_WIDTH,
};
use emberfield::effects::{BlackHole, Fireworks};
use emberfield::mount::{Bounds, HostEvent, Mount};
use emberfield::util::FpsCounter;
use sdl2::keyboard::Keycode;

/// Frames between FPS log lines
const FPS_LOG_INTERVAL: u64 = 120;

struct Args {
    width: u32,
    height: u32,
    vsync: bool,
    config: Option<String>,
}

/// Parse command line arguments
fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args {
        width: DEFAULT_WIDTH,
        height: DEFAULT_HEIGHT,
        vsync: true,
        config: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--no-vsync" => parsed.vsync = false,
            "--width" | "-w" => {
                if i + 1 < args.len() {
                    if let Ok(w) = args[i + 1].parse::<u32>() {
                        parsed.width = w;
                    }
                    i += 1;
                }
            },
            "--height" | "-h" => {
                if i + 1 < args.len() {
                    if let Ok(h) = args[i + 1].parse::<u32>() {
                        parsed.height = h;
                    }
                    i += 1;
                }
            },
            "--resolution" | "-r" => {
                if i + 1 < args.len() {
                    // WxH, e.g. 1920x1080
                    if let Some((w, h)) = args[i + 1].split_once('x') {
                        if let (Ok(w), Ok(h)) = (w.parse::<u32>(), h.parse::<u32>()) {
                            parsed.width = w;
                            parsed.height = h;
                        }
                    }
                    i += 1;
                }
            },
            "--config" => {
                if i + 1 < args.len() {
                    parsed.config = Some(args[i + 1].clone());
                    i += 1;
                }
            },
            "--help" => {
                println!("Usage: emberfield [OPTIONS]");
                println!();
                println!("Options:");
                println!(
                    "  --width W, -w W       Set window width (default: {})",
                    DEFAULT_WIDTH
                );
                println!(
                    "  --height H, -h H      Set window height (default: {})",
                    DEFAULT_HEIGHT
                );
                println!("  --resolution WxH, -r WxH  Set resolution (e.g., 1920x1080)");
                println!("  --no-vsync            Disable VSync for uncapped framerate");
                println!("  --config PATH         Load tuning from a JSON file");
                println!("  --help                Show this help message");
                println!();
                println!("Controls:");
                println!("  Click/touch  - Launch a mortar in the footer");
                println!("  F            - Toggle FPS logging");
                println!("  Escape       - Quit");
                std::process::exit(0);
            },
            _ => {},
        }
        i += 1;
    }

    parsed
}

/// Window-wide field container and the footer band below it
fn layout(width: u32, height: u32, host: &HostConfig) -> (Bounds, Bounds) {
    let footer_h = ((height as f32 * host.footer_fraction.clamp(0.0, 1.0)).round() as u32).min(height);
    let field = Bounds::new(0, 0, width, height);
    let footer = Bounds::new(0, (height - footer_h) as i32, width, footer_h);
    (field, footer)
}

/// Field underneath, footer screened on top at its layer opacity
fn compose(
    frame: &mut PixelBuffer,
    field: &Mount<BlackHole>,
    footer: &Mount<Fireworks>,
    host: &HostConfig,
) {
    match field.surface() {
        Some(surface) => frame.composite(surface, 0, 0, BlendMode::Alpha, 1.0),
        None => frame.clear(0, 0, 0),
    }

    if let Some(surface) = footer.surface() {
        let y = (footer.bounds().y as f32 * footer.dpi()).round() as i32;
        frame.composite(surface, 0, y, BlendMode::Screen, host.footer_opacity);
    }
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args();
    let config = match &args.config {
        Some(path) => Config::load(path).map_err(|e| e.to_string())?,
        None => Config::default(),
    };

    let (mut display, texture_creator) =
        Display::with_options("emberfield", args.width, args.height, args.vsync)?;

    let (win_w, win_h) = display.size();
    let dpi = display.device_pixel_ratio();
    let (field_bounds, footer_bounds) = layout(win_w, win_h, &config.host);

    let mut field = Mount::new(BlackHole::new(config.field.clone()), field_bounds, dpi);
    let mut footer = Mount::new(Fireworks::new(config.fireworks.clone()), footer_bounds, dpi);

    let (draw_w, draw_h) = display.drawable_size();
    let mut target = RenderTarget::with_size(&texture_creator, draw_w, draw_h)?;
    let mut frame = PixelBuffer::with_size(draw_w.max(1), draw_h.max(1));

    let mut fps_counter = FpsCounter::new(60);
    let mut show_fps = false;
    let mut frames: u64 = 0;

    log::info!("emberfield v{}", emberfield::VERSION);
    log::info!(
        "window {}x{} ({}x{} device pixels, {}x), vsync {}",
        win_w,
        win_h,
        draw_w,
        draw_h,
        dpi,
        if args.vsync { "on" } else { "off" }
    );
    log::info!(
        "{} discs, {} dots; footer {}px",
        config.field.disc_count,
        config.field.dot_count,
        footer_bounds.height
    );

    'main: loop {
        let (dt, avg_fps) = fps_counter.tick();

        for event in display.poll_events() {
            let host_event = match event {
                InputEvent::Quit | InputEvent::KeyDown(Keycode::Escape) => break 'main,
                InputEvent::KeyDown(Keycode::F) => {
                    show_fps = !show_fps;
                    continue;
                },
                InputEvent::KeyDown(_) => continue,
                InputEvent::PointerDown { x, y } => HostEvent::PointerDown { x, y },
                InputEvent::TouchStart { x, y } => HostEvent::TouchStart { x, y },
                InputEvent::Visibility(visible) => HostEvent::Visibility(visible),
                InputEvent::Resized { width, height } => {
                    let dpi = display.device_pixel_ratio();
                    let (draw_w, draw_h) = display.drawable_size();
                    target = RenderTarget::with_size(&texture_creator, draw_w, draw_h)?;
                    frame = PixelBuffer::with_size(draw_w.max(1), draw_h.max(1));

                    let (field_bounds, footer_bounds) = layout(width, height, &config.host);
                    field.dispatch(HostEvent::Resize {
                        bounds: field_bounds,
                        dpi,
                    });
                    footer.dispatch(HostEvent::Resize {
                        bounds: footer_bounds,
                        dpi,
                    });
                    log::debug!("resized to {}x{} ({}x{} device pixels)", width, height, draw_w, draw_h);
                    continue;
                },
            };
            field.dispatch(host_event);
            footer.dispatch(host_event);
        }

        field.tick(dt);
        footer.tick(dt);
        compose(&mut frame, &field, &footer, &config.host);

        frames += 1;
        if show_fps && frames % FPS_LOG_INTERVAL == 0 {
            let (min_fps, max_fps) = fps_counter.min_max_fps();
            log::info!(
                "FPS {} avg  {} min  {} max  {}ms",
                avg_fps as u32,
                min_fps as u32,
                max_fps as u32,
                fps_counter.avg_frame_time_ms() as u32
            );
        }

        display.present(&mut target, &frame)?;
    }

    field.teardown();
    footer.teardown();
    log::info!("bye after {} frames", frames);
    Ok(())
}
