//! Fixture simulation.
//!
//! Runs a real engine against an in-memory page built from a JSON fixture,
//! with file-backed storage, and optionally performs one pick.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{sleep, timeout};
use tracing::{info, warn};

use slactac_config::Config;
use slactac_core::{ChannelNotifier, Engine};
use slactac_dom_memory::{MemoryPage, PageFixture};
use slactac_protocols::{MessageSender, PointerSurface, UiMessage};
use slactac_store::file_storage;

const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Run the simulator.
pub(crate) async fn simulate(
    fixture: &Path,
    pick: Option<&str>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let pick = pick.map(parse_point).transpose()?;

    let page = Arc::new(PageFixture::load(fixture)?.into_page());
    let storage = file_storage(&config.storage.data_dir).await?;
    let (notifier, mut ui) = ChannelNotifier::new();
    let engine = Engine::new(page.clone(), storage, Arc::new(notifier), config.clone())?;

    info!("Simulating {} on {}", fixture.display(), page.hostname());
    engine.start();
    wait_for_first_pass(&engine).await;

    println!("Labels:");
    for text in page.texts_of(&config.selectors.label_class) {
        println!("  {}", text);
    }

    if let Some((x, y)) = pick {
        let sender = MessageSender::extension(engine.extension_id());
        let response = engine
            .handle_message(json!({ "action": "activateChannelPicker" }), &sender)
            .await;
        println!("{}", response.status);

        if response.is_success() {
            page.move_pointer(x, y);
            page.click(x, y);
            match wait_for_pick(&mut ui).await {
                Some(name) => println!("Picked: {}", name),
                None => println!("Nothing picked."),
            }
        }
    }

    engine.stop().await;
    Ok(())
}

/// Parse `X,Y` into viewport coordinates.
fn parse_point(value: &str) -> Result<(f64, f64), String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{}'", value))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate '{}': {}", s.trim(), e))
    };
    Ok((parse(x)?, parse(y)?))
}

async fn wait_for_first_pass(engine: &Engine<MemoryPage>) {
    let settled = timeout(SETTLE_TIMEOUT, async {
        while engine.reconciler().passes() == 0 {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    if settled.is_err() {
        warn!("Initial reconciliation did not complete");
    }
}

/// Collect notifications until the picker reports deactivation.
async fn wait_for_pick(ui: &mut UnboundedReceiver<UiMessage>) -> Option<String> {
    let mut picked = None;
    let finished = timeout(SETTLE_TIMEOUT, async {
        while let Some(message) = ui.recv().await {
            match message {
                UiMessage::ChannelPicked { channel_name } => picked = Some(channel_name),
                UiMessage::PickerDeactivated => break,
            }
        }
    })
    .await;
    if finished.is_err() {
        warn!("Picker did not finish");
    }
    picked
}
