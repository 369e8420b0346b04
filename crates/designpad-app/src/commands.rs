//! Command implementations.

use crate::backend::AnyBackend;
use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::replay::ReplayScript;
use designpad_core::storage::{DesignBackend, create_autosave_manager};
use designpad_core::{Design, EditorConfig, EditorSession, PersistenceClient};
use designpad_render::{RecordingSurface, RenderContext, render};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Run a parsed command line, writing results to stdout.
pub fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_deref())?;
    let mut out = std::io::stdout().lock();

    match &cli.command {
        Command::Restore => {
            let autosave = create_autosave_manager(config.autosave_interval_secs)?;
            match pollster::block_on(autosave.restore())? {
                Some(design) => writeln!(out, "{}", summarize(&design))?,
                None => writeln!(out, "No auto-saved design")?,
            }
            Ok(())
        }
        Command::Replay { script, save } => {
            let script = ReplayScript::load(script)?;
            let design = replay(&script, &config)?;

            // Mirror the result locally so `restore` can pick it up.
            let mut autosave = create_autosave_manager(config.autosave_interval_secs)?;
            pollster::block_on(autosave.tick(&design))?;

            if let Some(name) = save {
                let backend = AnyBackend::open(cli.store.clone(), cli.remote.as_deref(), &config)?;
                let client = PersistenceClient::new(Arc::new(backend));
                let version = pollster::block_on(client.save(name, &design))?;
                writeln!(out, "Saved '{}' (version {})", name.trim(), version)?;
            }
            writeln!(out, "{}", summarize(&design))?;
            Ok(())
        }
        command => {
            let backend = AnyBackend::open(cli.store.clone(), cli.remote.as_deref(), &config)?;
            let client = PersistenceClient::new(Arc::new(backend));
            execute(command, &client, &config, &mut out)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig, CliError> {
    let config = match path {
        Some(path) => EditorConfig::load(path)?,
        None => match EditorConfig::default_path() {
            Some(path) => EditorConfig::load_or_default(&path)?,
            None => EditorConfig::default(),
        },
    };
    Ok(config)
}

/// Run a command that only needs the design store.
pub(crate) fn execute<B: DesignBackend>(
    command: &Command,
    client: &PersistenceClient<B>,
    config: &EditorConfig,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        Command::List => {
            let designs = pollster::block_on(client.list())?;
            if designs.is_empty() {
                writeln!(out, "No saved designs")?;
            }
            for info in designs {
                writeln!(out, "{}\tv{}\t{}", info.name, info.version, info.saved_at)?;
            }
        }
        Command::Show { name } => {
            let design = load_existing(client, name)?;
            writeln!(out, "{}", summarize(&design))?;
        }
        Command::Delete { name } => {
            pollster::block_on(client.delete(name))?;
            writeln!(out, "Deleted '{}'", name.trim())?;
        }
        Command::Render { name, width, height } => {
            let design = load_existing(client, name)?;
            let mut surface = RecordingSurface::new(*width, *height)?;
            render(&mut surface, &RenderContext::new(&design).with_smoothing(config.smoothing));
            for command in surface.commands() {
                writeln!(out, "{}", command)?;
            }
        }
        Command::Replay { .. } | Command::Restore => {
            log::warn!("{:?} is not a store command", command);
        }
    }
    Ok(())
}

fn load_existing<B: DesignBackend>(client: &PersistenceClient<B>, name: &str) -> Result<Design, CliError> {
    pollster::block_on(client.load(name))?.ok_or_else(|| CliError::NotFound(name.to_string()))
}

/// Run a script against a fresh session and hand back the design.
pub(crate) fn replay(script: &ReplayScript, config: &EditorConfig) -> Result<Design, CliError> {
    let mut session = EditorSession::new(config.clone())?;
    script.run(&mut session)?;
    Ok(session.into_design())
}

/// Human-readable overview of a design.
pub(crate) fn summarize(design: &Design) -> String {
    let mut lines = vec![format!("Layers: {}", design.layers.len())];
    for layer in &design.layers {
        let mut flags = Vec::new();
        if !layer.visible {
            flags.push("hidden");
        }
        if layer.locked {
            flags.push("locked");
        }
        let flags = if flags.is_empty() { String::new() } else { format!(" ({})", flags.join(", ")) };
        let paths = design.paths.iter().filter(|p| p.layer == layer.id()).count();
        lines.push(format!("  {}{}: {} shapes, {} paths", layer.name, flags, layer.shapes.len(), paths));
        for shape in &layer.shapes {
            lines.push(format!(
                "    {} at ({}, {}) {}x{}",
                shape.kind.name(),
                shape.position.x,
                shape.position.y,
                shape.size.width,
                shape.size.height
            ));
        }
    }
    lines.push(format!("Paths: {}", design.paths.len()));
    lines.push(format!("Format version: {}", design.version));
    if let Some(saved_at) = design.saved_at {
        lines.push(format!("Saved at: {}", saved_at));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use designpad_core::storage::MemoryBackend;
    use designpad_core::{Shape, ShapeKind};
    use kurbo::{Point, Size};

    fn client_with_sketch() -> PersistenceClient<MemoryBackend> {
        let client = PersistenceClient::new(Arc::new(MemoryBackend::new()));
        let mut design = Design::new();
        let base = design.base_layer().id();
        design.add_shape(base, Shape::new(ShapeKind::Circle, Point::new(5.0, 5.0), Size::new(10.0, 10.0)));
        pollster::block_on(client.save("sketch1", &design)).unwrap();
        client
    }

    fn output(command: Command, client: &PersistenceClient<MemoryBackend>) -> Result<String, CliError> {
        let mut out = Vec::new();
        execute(&command, client, &EditorConfig::default(), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_list() {
        let client = client_with_sketch();
        let text = output(Command::List, &client).unwrap();
        assert!(text.starts_with("sketch1\tv1\t"));
    }

    #[test]
    fn test_show() {
        let client = client_with_sketch();
        let text = output(Command::Show { name: "sketch1".into() }, &client).unwrap();
        assert!(text.contains("Background: 1 shapes, 0 paths"));
        assert!(text.contains("circle at (5, 5) 10x10"));
        assert!(text.contains("Saved at:"));
    }

    #[test]
    fn test_show_missing() {
        let client = client_with_sketch();
        let result = output(Command::Show { name: "nope".into() }, &client);
        assert!(matches!(result, Err(CliError::NotFound(name)) if name == "nope"));
    }

    #[test]
    fn test_delete_twice() {
        let client = client_with_sketch();
        output(Command::Delete { name: "sketch1".into() }, &client).unwrap();
        let result = output(Command::Delete { name: "sketch1".into() }, &client);
        assert!(matches!(result, Err(CliError::Persistence(_))));
    }

    #[test]
    fn test_render_dump() {
        let client = client_with_sketch();
        let command = Command::Render {
            name: "sketch1".into(),
            width: 100,
            height: 100,
        };
        let text = output(command, &client).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "clear #ffffffff");
        assert!(lines[1].starts_with("fill #000000ff"));
    }

    #[test]
    fn test_render_zero_size() {
        let client = client_with_sketch();
        let command = Command::Render {
            name: "sketch1".into(),
            width: 0,
            height: 100,
        };
        assert!(matches!(output(command, &client), Err(CliError::Render(_))));
    }

    #[test]
    fn test_replay_then_save() {
        let script = ReplayScript::from_json(
            r#"{"steps": [
                {"action": "tool", "tool": "draw"},
                {"action": "input", "event": {"type": "pointer_down", "position": {"x": 0.0, "y": 0.0}}},
                {"action": "input", "event": {"type": "pointer_move", "position": {"x": 4.0, "y": 4.0}}},
                {"action": "input", "event": {"type": "pointer_leave"}}
            ]}"#,
        )
        .unwrap();
        let design = replay(&script, &EditorConfig::default()).unwrap();
        assert_eq!(design.paths.len(), 1);

        let dir = tempfile::tempdir().unwrap();
        let backend = AnyBackend::open(Some(dir.path().to_path_buf()), None, &EditorConfig::default()).unwrap();
        let client = PersistenceClient::new(Arc::new(backend));
        pollster::block_on(client.save("replayed", &design)).unwrap();
        let loaded = pollster::block_on(client.load("replayed")).unwrap().unwrap();
        assert_eq!(loaded.paths, design.paths);
    }
}
