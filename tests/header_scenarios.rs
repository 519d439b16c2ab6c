use std::time::{Duration, Instant};

use shade_header::prelude::*;
use shade_header::sim::standard_layout;

const WIDTH: f32 = 1080.0;

fn config() -> MemoryConfig {
    MemoryConfig::new()
        .with(ConfigKey::CollapsedHeight, 200.0)
        .with(ConfigKey::ExpandedHeight, 500.0)
        .with(ConfigKey::ShowWeatherHeader, true)
}

fn attached(host: SimHost) -> (Header<SimHost, MemoryConfig>, Instant) {
    let t0 = Instant::now();
    let mut header = Header::new(host, config());
    header.attach(t0);
    header.run_layout_pass();
    (header, t0)
}

fn refreshed() -> (Header<SimHost, MemoryConfig>, Instant) {
    let (mut header, t0) = attached(SimHost::standard(WIDTH, 200.0, 500.0));
    header.refresh_endpoints();
    (header, t0)
}

fn expanded() -> (Header<SimHost, MemoryConfig>, Instant) {
    let (mut header, t0) = refreshed();
    header.set_expanded(true);
    header.run_layout_pass();
    (header, t0)
}

fn ms(t0: Instant, millis: u64) -> Instant {
    t0 + Duration::from_millis(millis)
}

#[test]
fn test_progress_maps_to_height_with_rotation_frozen() {
    let (mut header, _) = refreshed();
    header.set_progress(0.3);

    assert_eq!(header.applied_height(), Some(290.0));
    assert_eq!(header.host().clip_height(), Some(290.0));
    assert_eq!(header.current_frame().settings_rotation, 90.0);
    assert_eq!(header.host().state(Element::Settings).unwrap().rotation, 90.0);
}

#[test]
fn test_rotation_late_in_progress() {
    let (mut header, _) = refreshed();
    header.set_progress(0.8);
    assert!((header.current_frame().settings_rotation - 36.0).abs() < 1e-3);
}

#[test]
fn test_tail_alpha_at_three_quarters() {
    let (mut header, _) = refreshed();
    assert_eq!(header.endpoint(Endpoint::Collapsed).settings_alpha, 0.0);
    assert_eq!(header.endpoint(Endpoint::Expanded).settings_alpha, 1.0);

    header.set_progress(0.75);
    assert!((header.current_frame().settings_alpha - 0.1667).abs() < 1e-3);
}

#[test]
fn test_same_height_is_not_reapplied() {
    let (mut header, _) = refreshed();
    header.set_progress(1.0);
    let writes = header.host().writes();

    header.set_progress(1.5);
    assert_eq!(header.host().writes(), writes);
}

#[test]
fn test_nothing_applied_before_attach() {
    let mut header = Header::new(SimHost::standard(WIDTH, 200.0, 500.0), config());
    header.set_progress(0.5);
    header.set_expanded(true);
    assert_eq!(header.host().writes(), 0);
    assert_eq!(header.host().layout_requests(), 0);
}

#[test]
fn test_capture_completes_before_new_progress() {
    let (mut header, _) = refreshed();
    header.set_expanded(true);
    assert!(header.is_capture_pending());

    let before = *header.current_frame();
    header.set_progress(1.0);
    assert_eq!(*header.current_frame(), before);

    header.run_layout_pass();
    assert!(!header.is_capture_pending());
    assert_eq!(header.current_frame(), header.endpoint(Endpoint::Expanded));
}

#[test]
fn test_refresh_twice_is_bit_identical() {
    let (mut header, _) = refreshed();
    let collapsed = *header.endpoint(Endpoint::Collapsed);
    let expanded = *header.endpoint(Endpoint::Expanded);

    header.refresh_endpoints();
    assert!(header.endpoint(Endpoint::Collapsed).bit_identical(&collapsed));
    assert!(header.endpoint(Endpoint::Expanded).bit_identical(&expanded));
}

#[test]
fn test_rtl_battery_mirrors_ltr() {
    let (mut ltr, _) = attached(SimHost::standard(WIDTH, 200.0, 500.0));
    let (mut rtl, _) = attached(SimHost::standard(WIDTH, 200.0, 500.0).mirrored());
    ltr.refresh_endpoints();
    rtl.refresh_endpoints();

    for which in [Endpoint::Collapsed, Endpoint::Expanded] {
        let ltr_x = ltr.endpoint(which).battery_x;
        let rtl_x = rtl.endpoint(which).battery_x;
        assert!((rtl_x - (WIDTH - ltr_x)).abs() < 1e-3, "{:?}", which);
    }

    ltr.set_progress(0.6);
    rtl.set_progress(0.6);
    let width = ltr.host().geometry(Element::SystemIcons).unwrap().width;
    let ltr_x = ltr.host().state(Element::SystemIcons).unwrap().x.unwrap();
    let rtl_x = rtl.host().state(Element::SystemIcons).unwrap().x.unwrap();
    assert!((rtl_x - (WIDTH - ltr_x - width)).abs() < 1e-3);
}

#[test]
fn test_direction_change_recaptures() {
    let (mut header, _) = refreshed();
    let passes = header.host().layout_passes();
    header.host_mut().set_direction(Direction::Rtl);
    header.run_layout_pass();

    assert_eq!(header.host().layout_passes(), passes + 1);
    assert!(!header.is_capture_pending());
    let icons = header.host().geometry(Element::SystemIcons).unwrap();
    assert_eq!(header.endpoint(Endpoint::Collapsed).battery_x, icons.left());
}

#[test]
fn test_direction_change_mid_progress_keeps_expanded_alphas() {
    let (mut header, _) = expanded();
    header.set_progress(0.5);
    assert_eq!(
        header.host().visibility(Element::Settings),
        Some(Visibility::Invisible)
    );

    header.host_mut().set_direction(Direction::Rtl);
    header.run_layout_pass();
    assert!(!header.is_capture_pending());
    let endpoint = header.endpoint(Endpoint::Expanded);
    assert_eq!(endpoint.settings_alpha, 1.0);
    assert_eq!(endpoint.halo_button_alpha, 1.0);

    header.set_progress(1.0);
    assert_eq!(header.host().visibility(Element::Settings), Some(Visibility::Visible));
    assert_eq!(header.host().visibility(Element::HaloButton), Some(Visibility::Visible));
}

#[test]
fn test_collapsed_progress_blends_captured_endpoints() {
    let (mut header, _) = attached(SimHost::standard(WIDTH, 200.0, 500.0));
    let collapsed_clock = standard_layout(WIDTH, 200.0, false).rects[&Element::Clock];
    let expanded_clock = standard_layout(WIDTH, 500.0, true).rects[&Element::Clock];
    assert_eq!(
        header.endpoint(Endpoint::Expanded).clock_y,
        expanded_clock.bottom()
    );

    header.set_progress(0.5);
    let midway = (collapsed_clock.bottom() + expanded_clock.bottom()) / 2.0;
    assert!((header.current_frame().clock_y - midway).abs() < 1e-3);
    let (collapsed, expanded) = (
        header.endpoint(Endpoint::Collapsed).battery_x,
        header.endpoint(Endpoint::Expanded).battery_x,
    );
    assert!((header.current_frame().battery_x - (collapsed + expanded) / 2.0).abs() < 1e-3);
}

#[test]
fn test_collapsed_text_keeps_natural_scale() {
    let (header, _) = attached(SimHost::standard(WIDTH, 200.0, 500.0));
    assert_eq!(header.host().state(Element::Time).unwrap().scale, 1.0);
    assert_eq!(header.host().state(Element::NetworkTraffic).unwrap().scale, 1.0);

    let (header, _) = expanded();
    let scale = header.config().clock_collapsed_scale();
    assert_eq!(header.host().state(Element::Time).unwrap().scale, scale);
    assert_eq!(header.host().state(Element::NetworkTraffic).unwrap().scale, 0.0);
}

#[test]
fn test_missing_element_keeps_working() {
    let mut host = SimHost::standard(WIDTH, 200.0, 500.0);
    host.remove(Element::HaloButton);
    host.remove(Element::TaskManager);
    let (mut header, _) = attached(host);
    header.refresh_endpoints();
    header.set_progress(0.9);

    assert!(header.host().state(Element::HaloButton).is_none());
    assert!((header.current_frame().settings_alpha - 0.6667).abs() < 1e-3);
}

#[test]
fn test_overlay_contention_enters_second_only() {
    let (mut header, t0) = expanded();
    header.request_overlay(OverlayKind::Detail, Some(OverlayContent::titled("Wi-Fi")));
    header.tick(ms(t0, 100));
    header.request_overlay(OverlayKind::WeatherDetail, Some(OverlayContent::default()));
    header.tick(ms(t0, 1100));
    header.tick(ms(t0, 2100));

    let entered: Vec<_> = header
        .take_events()
        .into_iter()
        .filter(|event| matches!(event, HeaderEvent::OverlayEntered(_)))
        .collect();
    assert_eq!(
        entered,
        vec![HeaderEvent::OverlayEntered(OverlayKind::WeatherDetail)]
    );
    assert_eq!(header.overlay_phase(), OverlayPhase::Shown);
}

#[test]
fn test_overlay_suspends_owned_alphas() {
    let (mut header, t0) = expanded();
    header.request_overlay(OverlayKind::Detail, Some(OverlayContent::titled("Wi-Fi")));
    header.tick(ms(t0, 400));
    assert_eq!(
        header.host().visibility(Element::WeatherImage),
        Some(Visibility::Invisible)
    );

    // Progress would make the weather image visible; the overlay owns it.
    header.set_progress(1.0);
    assert_eq!(
        header.host().visibility(Element::WeatherImage),
        Some(Visibility::Invisible)
    );

    header.request_overlay(OverlayKind::Detail, None);
    header.tick(ms(t0, 800));
    assert_eq!(header.overlay_phase(), OverlayPhase::Normal);
    assert_eq!(
        header.host().visibility(Element::WeatherImage),
        Some(Visibility::Visible)
    );
}

#[test]
fn test_collapse_dismisses_detail() {
    let (mut header, t0) = expanded();
    header.request_overlay(OverlayKind::Detail, Some(OverlayContent::titled("Wi-Fi")));
    header.tick(ms(t0, 400));
    assert_eq!(header.overlay_phase(), OverlayPhase::Shown);

    header.set_expanded(false);
    assert_eq!(header.overlay_phase(), OverlayPhase::Exiting);
    assert_eq!(header.progress(), 0.0);
}

#[test]
fn test_edit_mode_round_trip() {
    let (mut header, t0) = expanded();
    header.set_editing(true);
    header.tick(ms(t0, 400));
    assert_eq!(header.overlay_kind(), Some(OverlayKind::Edit));

    header.request_overlay(OverlayKind::Detail, Some(OverlayContent::titled("Wi-Fi")));
    assert_eq!(header.overlay_kind(), Some(OverlayKind::Edit));

    header.click_detail_header();
    header.tick(ms(t0, 800));
    assert!(!header.is_editing());
    assert_eq!(header.overlay_phase(), OverlayPhase::Normal);
    assert_eq!(
        header.take_events(),
        vec![
            HeaderEvent::OverlayEntered(OverlayKind::Edit),
            HeaderEvent::EditDone,
            HeaderEvent::OverlayExited(OverlayKind::Edit),
        ]
    );
}

#[test]
fn test_toggle_detail() {
    let (mut header, t0) = expanded();
    header.request_overlay(
        OverlayKind::Detail,
        Some(OverlayContent::titled("Bluetooth").with_toggle(true)),
    );
    header.tick(ms(t0, 400));
    header.take_events();

    header.click_detail_header();
    assert_eq!(header.take_events(), vec![HeaderEvent::ToggleChanged(false)]);

    header.set_toggle_state(true);
    assert_eq!(header.overlay_content().unwrap().toggle, Some(true));
    assert!(header.take_events().is_empty());
}

#[test]
fn test_weather_image_without_data_requests_settings() {
    let (mut header, _) = expanded();
    header.set_weather_valid(false);
    header.click_weather_image();
    assert_eq!(header.overlay_phase(), OverlayPhase::Normal);
    assert_eq!(
        header.take_events(),
        vec![HeaderEvent::WeatherSettingsRequested]
    );
}

#[test]
fn test_weather_detail_dismissed_by_progress() {
    let (mut header, t0) = expanded();
    header.set_weather_valid(true);
    header.click_weather_image();
    header.tick(ms(t0, 400));
    assert_eq!(header.overlay_kind(), Some(OverlayKind::WeatherDetail));
    assert!(header.host().state(Element::WeatherDetail).unwrap().clickable);

    header.set_progress(0.5);
    assert_eq!(header.overlay_phase(), OverlayPhase::Normal);
    assert_eq!(
        header.host().visibility(Element::WeatherDetail),
        Some(Visibility::Invisible)
    );
    assert!(!header.host().state(Element::WeatherDetail).unwrap().clickable);
    assert_eq!(
        header.take_events().last(),
        Some(&HeaderEvent::OverlayExited(OverlayKind::WeatherDetail))
    );
}

#[test]
fn test_weather_detail_click_exits_with_animation() {
    let (mut header, t0) = expanded();
    header.set_weather_valid(true);
    header.click_weather_image();
    header.tick(ms(t0, 400));
    header.click_weather_detail();
    assert_eq!(header.overlay_phase(), OverlayPhase::Exiting);

    header.tick(ms(t0, 800));
    assert_eq!(header.overlay_phase(), OverlayPhase::Normal);
    let reveal = header.host().state(Element::WeatherDetail).unwrap().reveal.unwrap();
    assert_eq!(reveal.radius, 0.0);
}

#[test]
fn test_config_change_reloads_and_recaptures() {
    let (mut header, t0) = refreshed();
    header
        .config_source_mut()
        .set(ConfigKey::ShowTaskManager, true);
    header.tick(ms(t0, 16));

    assert!(header.config().show_task_manager);
    assert!(header.is_capture_pending());
    header.run_layout_pass();
    assert!(!header.is_capture_pending());
}

#[test]
fn test_config_change_mid_progress_keeps_expanded_alphas() {
    let (mut header, t0) = expanded();
    header.set_progress(0.5);
    header.config_source_mut().set(ConfigKey::CrossFadeMs, 250.0);
    header.tick(ms(t0, 16));
    assert_eq!(header.config().cross_fade_ms, 250.0);
    header.run_layout_pass();

    let endpoint = header.endpoint(Endpoint::Expanded);
    assert_eq!(endpoint.settings_alpha, 1.0);
    assert_eq!(endpoint.halo_button_alpha, 1.0);
    header.set_progress(1.0);
    assert_eq!(header.host().visibility(Element::Settings), Some(Visibility::Visible));
    assert_eq!(header.host().visibility(Element::HaloButton), Some(Visibility::Visible));
}

#[test]
fn test_config_change_under_weather_detail_keeps_alphas() {
    let (mut header, t0) = expanded();
    header.set_progress(0.5);
    header.set_weather_valid(true);
    header.click_weather_image();
    header.tick(ms(t0, 400));
    assert_eq!(header.overlay_kind(), Some(OverlayKind::WeatherDetail));

    header.config_source_mut().set(ConfigKey::CrossFadeMs, 250.0);
    header.tick(ms(t0, 416));
    header.run_layout_pass();

    let endpoint = header.endpoint(Endpoint::Expanded);
    assert_eq!(endpoint.weather_image_alpha, 1.0);
    assert_eq!(endpoint.settings_alpha, 1.0);
}

#[test]
fn test_config_change_updates_heights() {
    let (mut header, t0) = refreshed();
    header
        .config_source_mut()
        .set(ConfigKey::ExpandedHeight, 600.0);
    header.tick(ms(t0, 16));

    header.set_progress(0.5);
    assert_eq!(header.applied_height(), Some(400.0));
}

#[test]
fn test_screen_on_schedules_weather_refresh() {
    let (mut header, t0) = refreshed();
    header.notify_screen_on();
    header.tick(ms(t0, 1999));
    assert!(header.take_events().is_empty());

    header.tick(ms(t0, 2000));
    assert_eq!(
        header.take_events(),
        vec![HeaderEvent::WeatherRefreshRequested]
    );
}

#[test]
fn test_detach_discards_endpoints() {
    let (mut header, _) = refreshed();
    header.set_progress(0.5);
    header.detach();

    assert_eq!(*header.current_frame(), Snapshot::default());
    let writes = header.host().writes();
    header.set_progress(0.9);
    assert_eq!(header.host().writes(), writes);
}
