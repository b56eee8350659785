/*!
 * Render sink interface and delivery marshalling.
 *
 * The pipeline never touches a display surface directly. Each channel owns
 * a `RenderHandle` that forwards cue sets onto a render loop task; the loop
 * owns the `RenderSink` and is the single execution context all deliveries
 * for that surface happen on. Sending is non-blocking, so position ticks on
 * the playback timing path never wait on rendering.
 *
 * Sinks have an explicit `open`/`close` lifecycle driven by the owning UI
 * layer (or the render loop) rather than being inferred from window events.
 */

use log::debug;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::app_config::ChannelStyle;
use crate::cue::CueSet;

/// External display surface for one channel
pub trait RenderSink: Send {
    /// The surface is about to receive cue sets
    fn open(&mut self);

    /// Display a cue set, replacing whatever was shown before.
    ///
    /// Must be idempotent and tolerate empty sets (clears the display) as
    /// well as overlapping-cue sets (the renderer decides stacking).
    fn show(&mut self, cues: &CueSet);

    /// The surface is going away; release whatever `open` acquired
    fn close(&mut self);
}

enum RenderCommand {
    Show(CueSet),
    Close,
}

/// Non-blocking handle delivering cue sets to a render loop
#[derive(Debug, Clone)]
pub struct RenderHandle {
    tx: mpsc::UnboundedSender<RenderCommand>,
}

impl RenderHandle {
    /// Forward a cue set to the sink's execution context.
    ///
    /// Never blocks. Deliveries to a torn-down surface are dropped.
    pub fn show(&self, cues: CueSet) {
        if self.tx.send(RenderCommand::Show(cues)).is_err() {
            debug!("Dropping cue delivery to a closed render surface");
        }
    }

    /// Ask the render loop to close the sink and exit
    pub fn close(&self) {
        let _ = self.tx.send(RenderCommand::Close);
    }
}

/// Spawn the render loop owning `sink`.
///
/// The loop opens the sink, applies deliveries in arrival order and closes
/// the sink when the handle is closed or dropped.
pub fn spawn_render_loop(mut sink: Box<dyn RenderSink>) -> (RenderHandle, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let task = tokio::spawn(async move {
        sink.open();
        while let Some(command) = rx.recv().await {
            match command {
                RenderCommand::Show(cues) => sink.show(&cues),
                RenderCommand::Close => break,
            }
        }
        sink.close();
    });

    (RenderHandle { tx }, task)
}

/// Terminal sink used by the CLI playback simulation.
///
/// Prints each delivered cue set on its own line, prefixed with the channel
/// label. Styling comes in at construction - the pipeline itself never
/// consults display preferences.
pub struct TerminalSink {
    label: String,
    style: ChannelStyle,
    showing: bool,
}

impl TerminalSink {
    /// Create a terminal sink for one channel
    pub fn new(label: impl Into<String>, style: ChannelStyle) -> Self {
        TerminalSink {
            label: label.into(),
            style,
            showing: false,
        }
    }
}

impl RenderSink for TerminalSink {
    fn open(&mut self) {
        debug!(
            "[{}] surface open (scale {:.2}, offset {:.2})",
            self.label, self.style.text_scale, self.style.vertical_offset
        );
    }

    fn show(&mut self, cues: &CueSet) {
        if cues.is_empty() {
            if self.showing {
                println!("[{}]", self.label);
                self.showing = false;
            }
            return;
        }

        let line = cues
            .iter()
            .map(|cue| cue.text().replace('\n', " | "))
            .collect::<Vec<_>>()
            .join("  //  ");
        println!("[{}] {}", self.label, line);
        self.showing = true;
    }

    fn close(&mut self) {
        debug!("[{}] surface closed", self.label);
    }
}
