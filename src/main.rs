mod app;

use app::ChatDockApp;
use chat_dock::chat::{
    ChatWindowManager, InMemoryThreadRegistry, SharedViewport, ThreadKind, ThreadMessage,
    ThreadRef, Viewport,
};
use chat_dock::config;
use chat_dock::event::InboundMessage;
use eframe::egui;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;
use std::sync::mpsc;
use tokio::time::{self, Duration};

struct DemoThread {
    thread: ThreadRef,
    name: &'static str,
    kind: ThreadKind,
    seeded: &'static [(&'static str, &'static str)],
}

fn demo_threads() -> Vec<DemoThread> {
    vec![
        DemoThread {
            thread: ThreadRef::channel(1),
            name: "Alice",
            kind: ThreadKind::Chat,
            seeded: &[("Alice", "Morning!"), ("me", "Hey Alice")],
        },
        DemoThread {
            thread: ThreadRef::channel(2),
            name: "Bob",
            kind: ThreadKind::Chat,
            seeded: &[],
        },
        DemoThread {
            thread: ThreadRef::channel(3),
            name: "general",
            kind: ThreadKind::Channel,
            seeded: &[("Carol", "Release is out")],
        },
        DemoThread {
            thread: ThreadRef::channel(4),
            name: "Carol",
            kind: ThreadKind::Chat,
            seeded: &[("Carol", "Lunch?")],
        },
        DemoThread {
            thread: ThreadRef::channel(5),
            name: "random",
            kind: ThreadKind::Channel,
            seeded: &[],
        },
    ]
}

/// Periodically pushes a message to one of the demo threads.
async fn simulate_inbound(
    threads: Vec<(ThreadRef, ThreadKind, &'static str, bool)>,
    tx: mpsc::Sender<InboundMessage>,
) {
    let mut ticker = time::interval(Duration::from_secs(7));
    ticker.tick().await;
    let mut with_history: BTreeSet<ThreadRef> = threads
        .iter()
        .filter(|(_, _, _, seeded)| *seeded)
        .map(|(thread, _, _, _)| thread.clone())
        .collect();
    let mut next_id = 10_000u64;

    for round in 0usize.. {
        ticker.tick().await;
        let (thread, kind, author, _) = &threads[round % threads.len()];
        let inbound = InboundMessage {
            thread: thread.clone(),
            kind: *kind,
            has_history: with_history.contains(thread),
            message: ThreadMessage {
                id: next_id,
                author: author.to_string(),
                body: format!("ping #{round}"),
                attachments: Vec::new(),
            },
        };
        next_id += 1;
        with_history.insert(thread.clone());
        if tx.send(inbound).is_err() {
            log::info!("inbound receiver dropped, stopping simulator");
            break;
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (layout_config, warnings) = config::load();
    for warning in &warnings {
        log::warn!("{warning}");
    }

    let mut registry = InMemoryThreadRegistry::new("me");
    let threads = demo_threads();
    for demo in &threads {
        registry.add_thread(demo.thread.clone(), demo.name, demo.kind);
        for (author, body) in demo.seeded {
            registry.push_message(&demo.thread, author, body);
        }
    }
    let registry = Rc::new(RefCell::new(registry));

    let (tx, rx) = mpsc::channel();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("chat-dock-runtime")
        .build()?;
    let feed = threads
        .iter()
        .map(|demo| (demo.thread.clone(), demo.kind, demo.name, !demo.seeded.is_empty()))
        .collect();
    runtime.spawn(simulate_inbound(feed, tx));

    let viewport = SharedViewport::new(Viewport::desktop(1280.0));
    let mut manager = ChatWindowManager::new(
        Box::new(registry.clone()),
        Box::new(viewport.clone()),
        Box::new(rx),
        layout_config,
    );
    manager.rebuild_from_registry();

    let app = ChatDockApp::new(manager, registry, viewport, warnings);
    let _runtime = runtime;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([320.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Chat Dock",
        native_options,
        Box::new(move |_creation_context| Ok(Box::new(app))),
    )?;

    Ok(())
}
