use std::time::{Duration, Instant};

use shade_header::prelude::*;

const FRAME: Duration = Duration::from_millis(16);

fn main() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .try_init();

    let config = MemoryConfig::new()
        .with(ConfigKey::CollapsedHeight, 200.0)
        .with(ConfigKey::ExpandedHeight, 500.0)
        .with(ConfigKey::ShowWeatherHeader, true);
    let host = SimHost::standard(1080.0, 200.0, 500.0);
    let mut header = Header::new(host, config);

    let mut now = Instant::now();
    header.attach(now);

    // Drag the shade open, one frame at a time
    for step in 0..=20 {
        let t = step as f32 / 20.0;
        header.set_progress(t);
        now += FRAME;
        header.tick(now);

        let frame = header.current_frame();
        println!(
            "t={:.2} height={:>5.1} rotation={:>5.1} settings_alpha={:.3} signal_alpha={:.3}",
            t,
            header.applied_height().unwrap_or_default(),
            frame.settings_rotation,
            frame.settings_alpha,
            frame.signal_cluster_alpha,
        );
    }

    header.set_expanded(true);
    header.run_layout_pass();
    header.set_alarm_showing(true);
    header.run_layout_pass();

    // Open a detail panel, then replace it with the weather panel before it
    // finishes entering
    header.request_overlay(
        OverlayKind::Detail,
        Some(OverlayContent::titled("Wi-Fi").with_toggle(true)),
    );
    header.set_weather_valid(true);
    for frame in 0..60 {
        now += FRAME;
        header.tick(now);
        if frame == 5 {
            header.click_weather_image();
        }
    }

    header.click_weather_detail();
    for _ in 0..60 {
        if header.overlay_phase() == OverlayPhase::Normal {
            break;
        }
        now += FRAME;
        header.tick(now);
    }

    for event in header.take_events() {
        println!("event: {:?}", event);
    }
    println!("host writes: {}", header.host().writes());
}
