mod input;

pub use input::{parse_command, CommandError, EditorCommand, HELP};

use crate::binding::{EditOutcome, SelectionSync, TargetStore, TextureLifecycle, TextureOutcome};
use crate::config::{self, EditorConfig};
use crate::render::{CameraController, MemoryRenderer, PointerEvent, ScenePicker, SelectionSource};
use crate::scene::SceneState;
use crate::ui::PanelIntent;

use std::fmt::Write as _;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    None,
    Message(String),
    Quit,
}

/// Headless editor session: the demo scene, its renderer stand-in and the
/// material panel's selection state.
pub struct App {
    config: EditorConfig,
    scene: SceneState,
    renderer: MemoryRenderer,
    camera: CameraController,
    sync: SelectionSync,
}

impl App {
    pub fn new(config: EditorConfig) -> config::Result<Self> {
        config.validate()?;
        let schema = config.load_schema()?;
        let mut renderer = MemoryRenderer::new();
        let scene = SceneState::demo(&mut renderer);
        let sync = SelectionSync::new(
            Arc::new(schema),
            TextureLifecycle::new(config.placeholder_texture.clone()),
        );
        Ok(Self {
            camera: config.camera(),
            config,
            scene,
            renderer,
            sync,
        })
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn renderer(&self) -> &MemoryRenderer {
        &self.renderer
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn sync(&self) -> &SelectionSync {
        &self.sync
    }

    pub fn execute(&mut self, command: EditorCommand) -> CommandOutcome {
        match command {
            EditorCommand::Click { x, y } => self.click(x, y),
            EditorCommand::Select(name) => {
                let Some(id) = self.scene.find_by_name(&name).map(|object| object.id) else {
                    return CommandOutcome::Message(format!("no object named {:?}", name));
                };
                self.sync.on_select(&self.scene, &self.renderer, Some(id));
                CommandOutcome::Message(self.describe_snapshot())
            }
            EditorCommand::Deselect => {
                self.sync.on_select(&self.scene, &self.renderer, None);
                CommandOutcome::Message("selection cleared".to_string())
            }
            EditorCommand::Set { index, value } => {
                self.intent_message(PanelIntent::Edit { index, value })
            }
            EditorCommand::TextureAdd { index } => {
                self.intent_message(PanelIntent::EnableDefaultTexture { index })
            }
            EditorCommand::TextureOn { index, source } => {
                self.intent_message(PanelIntent::SetTextureEnabled {
                    index,
                    enabled: true,
                    source,
                })
            }
            EditorCommand::TextureOff { index } => {
                self.intent_message(PanelIntent::SetTextureEnabled {
                    index,
                    enabled: false,
                    source: None,
                })
            }
            EditorCommand::Show => CommandOutcome::Message(self.describe_snapshot()),
            EditorCommand::Help => CommandOutcome::Message(HELP.to_string()),
            EditorCommand::Quit => CommandOutcome::Quit,
        }
    }

    /// Route a panel intent to the selection state.
    pub fn apply_intent(&mut self, intent: PanelIntent) -> EditOutcome {
        let (store, backend) = (&mut self.scene, &mut self.renderer);
        match intent {
            PanelIntent::Edit { index, value } => self.sync.on_edit(store, backend, index, value),
            PanelIntent::EnableDefaultTexture { index } => {
                self.sync.enable_default_texture(store, backend, index)
            }
            PanelIntent::SetTextureEnabled {
                index,
                enabled,
                source,
            } => self
                .sync
                .set_texture_enabled(store, backend, index, enabled, source.as_deref()),
        }
    }

    fn click(&mut self, x: f32, y: f32) -> CommandOutcome {
        let event = PointerEvent::primary(x, y);
        let picked = ScenePicker::new(&self.scene, &self.camera, self.config.viewport).pick(&event);
        match picked {
            Some(id) => {
                self.sync.on_select(&self.scene, &self.renderer, Some(id));
                CommandOutcome::Message(self.describe_snapshot())
            }
            // a miss keeps the current selection
            None => CommandOutcome::Message(format!("nothing under ({}, {})", x, y)),
        }
    }

    fn intent_message(&mut self, intent: PanelIntent) -> CommandOutcome {
        let index = match &intent {
            PanelIntent::Edit { index, .. }
            | PanelIntent::EnableDefaultTexture { index }
            | PanelIntent::SetTextureEnabled { index, .. } => *index,
        };
        let outcome = self.apply_intent(intent);
        let path = self
            .sync
            .snapshot()
            .and_then(|snapshot| snapshot.get(index))
            .map(|descriptor| descriptor.path())
            .unwrap_or_else(|| format!("#{}", index));
        let message = match outcome {
            EditOutcome::Applied => format!("{} updated", path),
            EditOutcome::ParentMissing => {
                format!("{} shown but not stored: parent is absent", path)
            }
            EditOutcome::Texture(TextureOutcome::Bound(id)) => format!("{} bound to {}", path, id),
            EditOutcome::Texture(TextureOutcome::Kept(id)) => format!("{} keeps {}", path, id),
            EditOutcome::Texture(TextureOutcome::Unbound(id)) => {
                format!("{} released {}", path, id)
            }
            EditOutcome::Texture(TextureOutcome::AlreadyUnbound) => {
                format!("{} has no texture", path)
            }
            EditOutcome::Texture(other) => format!("{}: {:?}", path, other),
            EditOutcome::Rejected(err) => format!("{} rejected: {}", path, err),
            EditOutcome::NoSelection => "nothing selected".to_string(),
            EditOutcome::TargetUnavailable => "selected object has no material".to_string(),
            EditOutcome::UnknownProperty(index) => format!("no property at index {}", index),
        };
        CommandOutcome::Message(message)
    }

    /// Text rendition of the material panel.
    pub fn describe_snapshot(&self) -> String {
        let Some(snapshot) = self.sync.snapshot() else {
            return "nothing selected".to_string();
        };
        let mut out = format!(
            "{} (generation {})",
            self.scene.describe(snapshot.target()),
            self.sync.generation()
        );
        for (index, descriptor) in snapshot.descriptors().iter().enumerate() {
            let _ = write!(
                out,
                "\n  [{:>2}] {:<24} {:<8} {}",
                index,
                descriptor.path(),
                descriptor.kind.label(),
                descriptor.display_value
            );
            if descriptor.texture_enabled {
                out.push_str(" (enabled)");
            }
        }
        out
    }

    /// Execute commands line by line until `quit` or end of input.
    pub fn run_commands<R: BufRead, W: Write>(
        &mut self,
        reader: R,
        out: &mut W,
    ) -> std::io::Result<()> {
        for line in reader.lines() {
            let line = line?;
            let command = match parse_command(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) => {
                    log::warn!("{}", err);
                    writeln!(out, "error: {}", err)?;
                    continue;
                }
            };
            match self.execute(command) {
                CommandOutcome::None => {}
                CommandOutcome::Message(message) => writeln!(out, "{}", message)?,
                CommandOutcome::Quit => break,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    script: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                parsed.config = Some(args.next().ok_or("--config needs a path")?.into());
            }
            "--script" => {
                parsed.script = Some(args.next().ok_or("--script needs a path")?.into());
            }
            other => return Err(format!("unexpected argument: {}", other)),
        }
    }
    Ok(parsed)
}

pub fn run() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("Material panel - property schema & binding engine");

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            log::error!("{}", err);
            eprintln!("usage: material-panel [--config <file>] [--script <file>]");
            std::process::exit(2);
        }
    };

    let config = match &args.config {
        Some(path) => match EditorConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("Failed to load config {}: {}", path.display(), err);
                std::process::exit(1);
            }
        },
        None => EditorConfig::default(),
    };

    let mut app = match App::new(config) {
        Ok(app) => app,
        Err(err) => {
            log::error!("Failed to start editor: {}", err);
            std::process::exit(1);
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = match &args.script {
        Some(path) => match std::fs::File::open(path) {
            Ok(file) => {
                log::info!("Running script {}", path.display());
                app.run_commands(std::io::BufReader::new(file), &mut out)
            }
            Err(err) => {
                log::error!("Failed to open script {}: {}", path.display(), err);
                std::process::exit(1);
            }
        },
        None => {
            log::info!("Reading commands from stdin; type `help` for a list");
            app.run_commands(std::io::stdin().lock(), &mut out)
        }
    };

    if let Err(err) = result {
        log::error!("Command loop stopped: {}", err);
    }
    log::info!("Goodbye!");
}
