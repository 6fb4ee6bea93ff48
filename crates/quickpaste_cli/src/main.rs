//! Command-line surface for QuickPaste: the popup's snippet management over
//! the local store.

use chrono::{Local, NaiveDate};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use quickpaste_core::{
    locale::{Catalog, Localizer, MessageKey},
    models::{
        settings::{LanguagePreference, Settings, SettingsPatch, SortMode, Theme},
        snippet::{CreateSnippetRequest, UpdateSnippetRequest},
    },
    search::{display_order, search},
    transfer::{export_file_name, export_json, parse_import, ImportSummary},
    AppError, Config, Database, Snippet,
};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;


#[derive(Parser)]
#[command(name = "qpaste", about = "QuickPaste CLI", version)]
struct Cli {
    /// Storage directory (defaults to QUICKPASTE_DB_PATH or ~/.cache/quickpaste/db)
    #[arg(long)]
    db_path: Option<String>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// List snippets in display order
    List {
        #[arg(short, long)]
        limit: Option<usize>,
        /// Override the stored sort preference
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
    },
    /// Fuzzy-search snippet titles
    Search { query: String },
    /// Print one snippet's content
    Get {
        id: String,
        /// Print the plain-text rendering instead of HTML
        #[arg(long)]
        plain: bool,
    },
    /// Create a snippet from a file or stdin
    New {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        file: Option<String>,
    },
    /// Change a snippet's title and/or content
    Edit {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        file: Option<String>,
    },
    Delete { id: String },
    /// Write a backup file (`-` for stdout)
    Export {
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Merge a backup file into the store
    Import { file: PathBuf },
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    Show,
    Set {
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,
        /// `auto` or a bundled language code
        #[arg(long)]
        language: Option<String>,
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(value: ThemeArg) -> Self {
        match value {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SortArg {
    Default,
    Alpha,
}

impl From<SortArg> for SortMode {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Default => SortMode::Default,
            SortArg::Alpha => SortMode::Alpha,
        }
    }
}

/// Everything a command needs: the open store and the user's language.
struct Session<'a> {
    db: Database,
    config: Config,
    settings: Settings,
    catalog: &'a Catalog,
    localizer: Localizer<'a>,
    json: bool,
}

impl<'a> Session<'a> {
    fn open(config: Config, catalog: &'a Catalog, json: bool) -> Result<Self, AppError> {
        let db = Database::from_config(&config)?;
        let settings = db.settings.get()?;
        let language = catalog.resolve_language(&settings.language, &config.ui_language);
        Ok(Self {
            db,
            localizer: catalog.localizer(language),
            settings,
            catalog,
            config,
            json,
        })
    }

    fn text(&self, key: MessageKey) -> String {
        self.localizer.text(key)
    }

    /// Map a store error to a localized failure message.
    fn describe(&self, err: AppError) -> String {
        match err {
            AppError::BadRequest(detail) => format!("{} ({})", self.text(MessageKey::SnippetError), detail),
            AppError::NotFound => self.text(MessageKey::SnippetNotFound),
            other => other.to_string(),
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("quickpaste_core=warn,quickpaste_cli=info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn exit_with_failure(action: &str, message: &str) -> ! {
    eprintln!("{} failed: {}", action, message);
    std::process::exit(1);
}

fn encode_json(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|err| format!("output encoding error: {}", err))
}

fn read_content(file: Option<&str>) -> io::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn format_summary_output(snippets: &[&Snippet], json: bool, empty: &str) -> Result<String, String> {
    if json {
        return encode_json(&snippets);
    }
    if snippets.is_empty() {
        return Ok(empty.to_string());
    }
    let rows: Vec<String> = snippets
        .iter()
        .map(|snippet| format!("{:<36} {}", snippet.id, snippet.title))
        .collect();
    Ok(rows.join("\n"))
}

fn format_get_output(snippet: &Snippet, json: bool, plain: bool) -> Result<String, String> {
    if json {
        return encode_json(snippet);
    }
    Ok(if plain {
        snippet.plain_text()
    } else {
        snippet.content.clone()
    })
}

fn format_settings_output(settings: &Settings, language: &str, json: bool) -> Result<String, String> {
    if json {
        return encode_json(settings);
    }
    let theme = match settings.theme {
        Theme::Light => "light",
        Theme::Dark => "dark",
    };
    let sort = match settings.sort {
        SortMode::Default => "default",
        SortMode::Alpha => "alpha",
    };
    let preference = String::from(settings.language.clone());
    Ok(format!(
        "theme:    {}\nlanguage: {} ({})\nsort:     {}",
        theme, preference, language, sort
    ))
}

fn format_import_output(summary: ImportSummary, message: &str, json: bool) -> Result<String, String> {
    if json {
        return encode_json(&serde_json::json!({
            "added": summary.added,
            "skipped": summary.skipped,
        }));
    }
    Ok(format!(
        "{}: {} added, {} skipped",
        message, summary.added, summary.skipped
    ))
}

/// Where `export` writes when no `--out` is given.
fn default_export_path(today: NaiveDate) -> PathBuf {
    PathBuf::from(export_file_name(today))
}

fn list_snippets(session: &Session<'_>, limit: Option<usize>, sort: Option<SortArg>) -> Result<String, String> {
    let snippets = session.db.snippets.list().map_err(|err| session.describe(err))?;
    let sort = sort.map(SortMode::from).unwrap_or(session.settings.sort);
    let mut ordered = display_order(snippets.iter().collect(), sort);
    if let Some(limit) = limit {
        ordered.truncate(limit);
    }
    format_summary_output(&ordered, session.json, &session.text(MessageKey::NoSnippets))
}

fn search_snippets(session: &Session<'_>, query: &str) -> Result<String, String> {
    let snippets = session.db.snippets.list().map_err(|err| session.describe(err))?;
    let hits = search(&snippets, query);
    format_summary_output(&hits, session.json, &session.text(MessageKey::NoSnippetsFound))
}

fn get_snippet(session: &Session<'_>, id: &str, plain: bool) -> Result<String, String> {
    match session.db.snippets.find(id) {
        Ok(Some(snippet)) => format_get_output(&snippet, session.json, plain),
        Ok(None) => Err(session.text(MessageKey::SnippetNotFound)),
        Err(err) => Err(session.describe(err)),
    }
}

fn create_snippet(session: &Session<'_>, title: String, content: String) -> Result<String, String> {
    let snippet = session
        .db
        .snippets
        .create(CreateSnippetRequest { title, content })
        .map_err(|err| session.describe(err))?;
    if session.json {
        return encode_json(&snippet);
    }
    Ok(format!(
        "{}: {} ({})",
        session.text(MessageKey::SnippetAdded),
        snippet.title,
        snippet.id
    ))
}

fn edit_snippet(session: &Session<'_>, id: &str, request: UpdateSnippetRequest) -> Result<String, String> {
    let updated = session
        .db
        .snippets
        .update(id, request)
        .map_err(|err| session.describe(err))?
        .ok_or_else(|| session.text(MessageKey::SnippetNotFound))?;
    if session.json {
        return encode_json(&updated);
    }
    Ok(format!(
        "{}: {} ({})",
        session.text(MessageKey::SnippetUpdated),
        updated.title,
        updated.id
    ))
}

fn delete_snippet(session: &Session<'_>, id: &str) -> Result<String, String> {
    let deleted = session
        .db
        .snippets
        .delete(id)
        .map_err(|err| session.describe(err))?;
    if !deleted {
        return Err(session.text(MessageKey::SnippetNotFound));
    }
    if session.json {
        return encode_json(&serde_json::json!({ "deleted": id }));
    }
    Ok(format!("{}: {}", session.text(MessageKey::SnippetDeleted), id))
}

/// Export every snippet. `-` writes the backup itself to stdout.
fn export_snippets(session: &Session<'_>, out: Option<PathBuf>, today: NaiveDate) -> Result<String, String> {
    let snippets = session.db.snippets.list().map_err(|err| session.describe(err))?;
    let backup = export_json(&snippets).map_err(|err| err.to_string())?;
    let target = out.unwrap_or_else(|| default_export_path(today));
    if target == Path::new("-") {
        return Ok(backup);
    }
    std::fs::write(&target, backup)
        .map_err(|err| format!("cannot write {}: {}", target.display(), err))?;
    if session.json {
        return encode_json(&serde_json::json!({
            "path": target.display().to_string(),
            "count": snippets.len(),
        }));
    }
    Ok(format!(
        "{}: {} ({})",
        session.text(MessageKey::ExportSuccess),
        target.display(),
        snippets.len()
    ))
}

/// Validate and merge a backup. An invalid file leaves the store untouched.
///
/// With auto-backup enabled the current store is exported next to the
/// database before anything is merged.
fn import_snippets(session: &Session<'_>, raw: &str, today: NaiveDate) -> Result<String, String> {
    let records = parse_import(raw, session.db.snippets.max_content_size()).map_err(|err| {
        tracing::warn!(error = %err, "rejected import file");
        format!("{} ({})", session.text(MessageKey::ImportError), err)
    })?;

    if session.config.auto_backup {
        let current = session.db.snippets.list().map_err(|err| session.describe(err))?;
        let backup = export_json(&current).map_err(|err| err.to_string())?;
        let path = Path::new(&session.config.db_path).join(export_file_name(today));
        std::fs::write(&path, backup)
            .map_err(|err| format!("cannot write backup {}: {}", path.display(), err))?;
        tracing::info!(path = %path.display(), "wrote pre-import backup");
    }

    let summary = session
        .db
        .snippets
        .import(records)
        .map_err(|err| session.describe(err))?;
    format_import_output(summary, &session.text(MessageKey::ImportSuccess), session.json)
}

fn show_settings(session: &Session<'_>) -> Result<String, String> {
    format_settings_output(&session.settings, session.localizer.language(), session.json)
}

fn settings_patch(
    catalog: &Catalog,
    theme: Option<ThemeArg>,
    language: Option<String>,
    sort: Option<SortArg>,
) -> Result<SettingsPatch, String> {
    let language = language.map(LanguagePreference::from);
    if let Some(LanguagePreference::Locale(code)) = &language {
        if !catalog.supports(code) {
            return Err(format!("unsupported language '{}'", code));
        }
    }
    let patch = SettingsPatch {
        theme: theme.map(Theme::from),
        language,
        sort: sort.map(SortMode::from),
    };
    if patch.theme.is_none() && patch.language.is_none() && patch.sort.is_none() {
        return Err("nothing to change (use --theme, --language or --sort)".to_string());
    }
    Ok(patch)
}

fn update_settings(session: &Session<'_>, patch: SettingsPatch) -> Result<String, String> {
    let updated = session
        .db
        .settings
        .update(patch)
        .map_err(|err| session.describe(err))?;
    // Confirm in the language the user just picked.
    let language = session
        .catalog
        .resolve_language(&updated.language, &session.config.ui_language);
    let localizer = session.catalog.localizer(language);
    if session.json {
        return encode_json(&updated);
    }
    Ok(localizer.text(MessageKey::SettingsSaved))
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let Cli {
        db_path,
        json,
        command,
    } = Cli::parse();

    if let Commands::Completions { shell } = &command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let mut config = Config::from_env();
    if let Some(path) = db_path {
        config.db_path = path;
    }
    let catalog = Catalog::bundled()?;
    let session = match Session::open(config, &catalog, json) {
        Ok(session) => session,
        Err(err) => exit_with_failure("Open", &err.to_string()),
    };
    let today = Local::now().date_naive();

    let (action, result) = match command {
        Commands::Completions { .. } => return Ok(()),
        Commands::List { limit, sort } => ("List", list_snippets(&session, limit, sort)),
        Commands::Search { query } => ("Search", search_snippets(&session, &query)),
        Commands::Get { id, plain } => ("Get", get_snippet(&session, &id, plain)),
        Commands::New { title, file } => {
            let content = read_content(file.as_deref())?;
            ("New", create_snippet(&session, title, content))
        }
        Commands::Edit { id, title, file } => {
            // Without --file, stdin supplies content unless only the title changes.
            let content = match file {
                Some(path) => Some(read_content(Some(path.as_str()))?),
                None if title.is_none() => Some(read_content(None)?),
                None => None,
            };
            ("Edit", edit_snippet(&session, &id, UpdateSnippetRequest { title, content }))
        }
        Commands::Delete { id } => ("Delete", delete_snippet(&session, &id)),
        Commands::Export { out } => ("Export", export_snippets(&session, out, today)),
        Commands::Import { file } => {
            let raw = std::fs::read_to_string(&file)?;
            ("Import", import_snippets(&session, &raw, today))
        }
        Commands::Settings { action } => match action {
            SettingsAction::Show => ("Settings", show_settings(&session)),
            SettingsAction::Set {
                theme,
                language,
                sort,
            } => (
                "Settings",
                settings_patch(&catalog, theme, language, sort)
                    .and_then(|patch| update_settings(&session, patch)),
            ),
        },
    };

    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            Ok(())
        }
        Err(message) => exit_with_failure(action, &message),
    }
}
