use super::{notify, render_servers, Context};
use crate::editor::{
    format_json, preview_config, record_to_json_text, App, EditSession, EditorView, FormFields,
    SaveOutcome, ServerEditor, CLEAR_FILE_PROMPT,
};
use crate::error::EditorError;
use anyhow::{bail, Context as _, Result};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::debug;

const HELP: &str = "\
Project:
  open [DIR]          open a project directory (prompts when DIR is omitted)
  ls                  list servers in the project
  show [NAME]         print the project, or one server, as JSON
  rm NAME             remove a server from the project
  import              paste a whole {\"mcpServers\": ...} document and apply it
  validate            check the project configuration
  save                write .mcp.json
Saved servers:
  saved               list saved servers
  use NAME            copy a saved server into the project
  rm-saved NAME       delete a saved server
Editing:
  new                 start a new server
  edit NAME           edit a server in the project
  edit-saved NAME     edit a saved server
  name VALUE          set the name
  command VALUE       set the command
  arg VALUE           append an argument
  clear-args          remove all arguments
  env JSON            set the environment as a JSON object
  view form|json      switch editor view
  json [TEXT]         set the JSON text (paste mode when TEXT is omitted)
  format              re-indent the JSON text
  print               show the editor
  submit              commit the edit
  cancel              discard the edit
Other:
  help, quit";

enum Flow {
    Continue,
    Quit,
}

/// Line-oriented editing session. The project file is written only on `save`.
pub async fn run_shell(app: &mut App, ctx: &Context) -> Result<()> {
    let input = BufReader::new(tokio::io::stdin());
    let mut shell = Shell::new(app, input);

    if ctx.dir.is_some() {
        let dir = ctx.project_dir()?;
        shell.open(dir).await?;
    } else if let Some(last) = shell.app.last_directory().map(PathBuf::from) {
        if last.is_dir() {
            if let Err(err) = shell.open(last).await {
                notify::error(err);
            }
        }
    }

    println!("{}", "mcpdesk shell. Type `help` for commands.".dimmed());
    shell.run().await
}

struct Shell<'a, R> {
    app: &'a mut App,
    lines: Lines<R>,
}

impl<'a, R> Shell<'a, R>
where
    R: AsyncBufRead + Unpin,
{
    fn new(app: &'a mut App, input: R) -> Self {
        Self {
            app,
            lines: input.lines(),
        }
    }

    async fn run(&mut self) -> Result<()> {
        while let Some(line) = self.lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (command, rest) = match line.split_once(char::is_whitespace) {
                Some((command, rest)) => (command, rest.trim()),
                None => (line, ""),
            };
            debug!(command, "shell command");

            match self.dispatch(command, rest).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                // Failures leave the edit in progress untouched.
                Err(err) => notify::error(format!("{:#}", err)),
            }
        }
        Ok(())
    }

    async fn dispatch(&mut self, command: &str, rest: &str) -> Result<Flow> {
        match command {
            "help" => println!("{}", HELP),
            "quit" | "exit" => return Ok(Flow::Quit),

            "open" => {
                if rest.is_empty() {
                    match self.app.select_directory().await? {
                        Some(dir) => notify::success(format!("Opened {}", dir.display())),
                        None => notify::warning("No directory selected"),
                    }
                } else {
                    let dir = PathBuf::from(rest);
                    if !dir.is_dir() {
                        bail!("Not a directory: {:?}", dir);
                    }
                    let dir = dir
                        .canonicalize()
                        .with_context(|| format!("Failed to resolve directory {:?}", dir))?;
                    self.open(dir).await?;
                }
            }
            "ls" => {
                if self.app.current().is_empty() {
                    println!("{}", "No servers configured".dimmed());
                } else {
                    println!("{}", render_servers(self.app.current().servers.iter()));
                }
            }
            "saved" => {
                if self.app.library().is_empty() {
                    println!("{}", "No saved servers".dimmed());
                } else {
                    let saved = self.app.library().entries().iter().map(|(n, r)| (n, r));
                    println!("{}", render_servers(saved));
                }
            }
            "show" => {
                if rest.is_empty() {
                    println!("{}", self.app.current_json_text());
                } else {
                    let record = self
                        .app
                        .current()
                        .servers
                        .get(rest)
                        .ok_or_else(|| EditorError::ServerNotFound(rest.to_string()))?;
                    println!("{}", record_to_json_text(rest, record));
                }
            }
            "rm" => {
                let name = required(rest, "rm NAME")?;
                if !self.app.current().servers.contains_key(name) {
                    return Err(EditorError::ServerNotFound(name.to_string()).into());
                }
                if self
                    .ask(&format!("Are you sure you want to remove server \"{}\"?", name))
                    .await?
                {
                    self.app.remove_current(name);
                    notify::success(format!("Server \"{}\" removed", name));
                }
            }
            "import" => {
                let text = self.read_block().await?;
                let preview = preview_config(&text)?;
                for (name, summary) in &preview.servers {
                    println!("  {} {}", name.cyan(), summary.dimmed());
                }
                let count = self.app.apply_config_json(&text).await?;
                notify::success(format!("Applied {} server configuration(s)", count));
            }
            "validate" => {
                self.app.validate_current().await?;
                notify::success("Configuration is valid");
            }
            "save" => {
                if self.app.directory().is_none() {
                    return Err(EditorError::NoDirectory.into());
                }
                let answer = if self.app.current().is_empty() {
                    self.ask(CLEAR_FILE_PROMPT).await?
                } else {
                    true
                };
                match self.app.save_current(&mut |_: &str| answer).await? {
                    SaveOutcome::Saved(count) => {
                        notify::success(format!("Configuration saved ({} server(s))", count))
                    }
                    SaveOutcome::Cleared => notify::success(".mcp.json contents cleared"),
                    SaveOutcome::Cancelled => notify::warning("Save cancelled"),
                }
            }

            "use" => {
                let name = required(rest, "use NAME")?;
                self.app.copy_saved_to_current(name)?;
                notify::success(format!("Server \"{}\" added to current configuration", name));
            }
            "rm-saved" => {
                let name = required(rest, "rm-saved NAME")?;
                if !self.app.library().contains(name) {
                    return Err(EditorError::SavedServerNotFound(name.to_string()).into());
                }
                if self.ask(&format!("Delete saved server \"{}\"?", name)).await? {
                    self.app.remove_saved(name).await?;
                    notify::success(format!("Saved server \"{}\" deleted", name));
                }
            }

            "new" => {
                self.app.begin_create();
                self.print_editor();
            }
            "edit" => {
                let name = required(rest, "edit NAME")?;
                self.app.begin_edit_current(name)?;
                self.print_editor();
            }
            "edit-saved" => {
                let name = required(rest, "edit-saved NAME")?;
                self.app.begin_edit_saved(name)?;
                self.print_editor();
            }
            "name" => self.form()?.name = rest.to_string(),
            "command" => self.form()?.command = rest.to_string(),
            "arg" => {
                let arg = required(rest, "arg VALUE")?;
                let form = self.form()?;
                if !form.args.is_empty() {
                    form.args.push('\n');
                }
                form.args.push_str(arg);
            }
            "clear-args" => self.form()?.args.clear(),
            "env" => self.form()?.env = rest.to_string(),
            "view" => {
                let view = match rest {
                    "form" => EditorView::Form,
                    "json" => EditorView::Json,
                    _ => bail!("usage: view form|json"),
                };
                self.editor()?.switch_to(view)?;
                self.print_editor();
            }
            "json" => {
                if self.editor()?.view() != EditorView::Json {
                    bail!("Switch to the JSON view first (`view json`)");
                }
                let text = if rest.is_empty() {
                    self.read_block().await?
                } else {
                    rest.to_string()
                };
                self.editor()?.set_json_text(text);
            }
            "format" => {
                let editor = self.editor()?;
                if editor.view() != EditorView::Json {
                    bail!("Switch to the JSON view first (`view json`)");
                }
                let formatted = format_json(editor.json_text())?;
                editor.set_json_text(formatted);
                self.print_editor();
            }
            "print" => {
                self.editor()?;
                self.print_editor();
            }
            "submit" => {
                let saved = self.app.session().is_saved();
                let name = self.app.submit().await?;
                if saved {
                    notify::success(format!("Saved server \"{}\" updated", name));
                } else {
                    notify::success(format!("Server \"{}\" configuration saved", name));
                }
            }
            "cancel" => self.app.cancel(),

            other => bail!("Unknown command `{}`. Type `help` for commands.", other),
        }
        Ok(Flow::Continue)
    }

    async fn open(&mut self, dir: PathBuf) -> Result<()> {
        let found = self.app.open_directory(dir.clone()).await?;
        if found {
            notify::success(format!(
                "Existing configuration loaded from {} ({} server(s))",
                dir.display(),
                self.app.current().len()
            ));
        } else {
            notify::success(format!("Opened {} (no .mcp.json yet)", dir.display()));
        }
        Ok(())
    }

    fn editor(&mut self) -> Result<&mut ServerEditor, EditorError> {
        self.app.editor_mut().ok_or(EditorError::NotEditing)
    }

    fn form(&mut self) -> Result<&mut FormFields> {
        let editor = self.editor()?;
        if editor.view() != EditorView::Form {
            bail!("Switch to the form view first (`view form`)");
        }
        Ok(editor.form_mut())
    }

    async fn ask(&mut self, prompt: &str) -> Result<bool> {
        println!("{} [y/N]", prompt);
        let answer = self.lines.next_line().await?.unwrap_or_default();
        Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }

    /// Reads lines up to a lone `.`.
    async fn read_block(&mut self) -> Result<String> {
        println!("{}", "Paste JSON, then a line with only `.`".dimmed());
        let mut block = Vec::new();
        while let Some(line) = self.lines.next_line().await? {
            if line.trim() == "." {
                break;
            }
            block.push(line);
        }
        Ok(block.join("\n"))
    }

    fn print_editor(&self) {
        let Some(editor) = self.app.editor() else {
            return;
        };
        let title = match self.app.session() {
            EditSession::Idle => "New server".to_string(),
            EditSession::EditingCurrent(name) => format!("Editing server \"{}\"", name),
            EditSession::EditingSaved(name) => format!("Editing saved server \"{}\"", name),
        };
        println!("{}", title.bold());

        match editor.view() {
            EditorView::Form => {
                let form = editor.form();
                println!("  {:<8} {}", "name".dimmed(), form.name);
                println!("  {:<8} {}", "command".dimmed(), form.command);
                for arg in form.args.lines() {
                    println!("  {:<8} {}", "arg".dimmed(), arg);
                }
                if !form.env.trim().is_empty() {
                    println!("  {:<8} {}", "env".dimmed(), form.env.replace('\n', " "));
                }
            }
            EditorView::Json => println!("{}", editor.json_text()),
        }
    }
}

fn required<'s>(value: &'s str, usage: &str) -> Result<&'s str> {
    if value.is_empty() {
        bail!("usage: {}", usage);
    }
    Ok(value)
}
