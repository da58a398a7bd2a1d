#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

use std::io::Write;
use std::time::Duration;

use storefront_shell::models::SurfaceEvent;
use storefront_shell::surface::LOAD_TIMEOUT_ARG;
use tao::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoopBuilder},
    window::WindowBuilder,
};

#[cfg(target_os = "linux")]
use tao::platform::unix::WindowExtUnix;

use wry::{PageLoadEvent, WebViewBuilder};

#[cfg(target_os = "linux")]
use wry::WebViewBuilderExtUnix;

const DEFAULT_LOAD_TIMEOUT_MS: u64 = 15_000;

enum UserEvent {
    PageFinished(String),
    LoadDeadline,
}

fn report(ev: &SurfaceEvent) {
    let mut out = std::io::stdout().lock();
    let _ = writeln!(out, "{}", ev.to_line());
    let _ = out.flush();
}

fn is_web_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

fn main() {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let url = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .cloned()
        .unwrap_or_else(|| {
            eprintln!("Usage: storefront-web <url> [{LOAD_TIMEOUT_ARG} <ms>]");
            std::process::exit(2);
        });
    let load_timeout_ms = args
        .iter()
        .position(|a| a == LOAD_TIMEOUT_ARG)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_LOAD_TIMEOUT_MS);

    let event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();
    let window = WindowBuilder::new()
        .with_title("Storefront")
        .build(&event_loop)
        .expect("create window");

    let page_proxy = event_loop.create_proxy();
    let builder = WebViewBuilder::new()
        .with_url(&url)
        .with_on_page_load_handler(move |event, loaded_url| {
            if matches!(event, PageLoadEvent::Finished) {
                let _ = page_proxy.send_event(UserEvent::PageFinished(loaded_url));
            }
        });

    #[cfg(not(target_os = "linux"))]
    let _webview = builder.build(&window).expect("build webview");

    // On Linux, using GTK build supports Wayland too.
    #[cfg(target_os = "linux")]
    let _webview = builder
        .build_gtk(window.gtk_window())
        .expect("build gtk webview");

    let deadline_proxy = event_loop.create_proxy();
    std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(load_timeout_ms));
        let _ = deadline_proxy.send_event(UserEvent::LoadDeadline);
    });

    let mut settled = false;
    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::UserEvent(UserEvent::PageFinished(loaded_url)) if !settled => {
                settled = true;
                if is_web_url(&loaded_url) {
                    report(&SurfaceEvent::Loaded { url: url.clone() });
                } else {
                    // Platform error pages land on non-http schemes.
                    report(&SurfaceEvent::LoadFailed {
                        url: url.clone(),
                        reason: format!("main frame landed on {loaded_url}"),
                    });
                    report(&SurfaceEvent::Closed);
                    *control_flow = ControlFlow::Exit;
                }
            }
            Event::UserEvent(UserEvent::LoadDeadline) if !settled => {
                settled = true;
                report(&SurfaceEvent::LoadFailed {
                    url: url.clone(),
                    reason: format!("no main frame load within {load_timeout_ms} ms"),
                });
                report(&SurfaceEvent::Closed);
                *control_flow = ControlFlow::Exit;
            }
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                report(&SurfaceEvent::Closed);
                *control_flow = ControlFlow::Exit;
            }
            _ => {}
        }
    });
}
