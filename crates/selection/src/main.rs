//! selection - command-line host for the Selection Lite widget bundle
//!
//! Renders widgets from settings snapshots, manages the site's custom CSS
//! and runs the admin-side checks outside of a CMS.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};

use selection_core::admin::{self, CustomCssTab, Screen};
use selection_core::assets::{self, AssetRegistry};
use selection_core::breadcrumbs::{self, PageContext};
use selection_core::custom_css::CustomCssStore;
use selection_core::duplicates::{self, DuplicateScan};
use selection_core::options::JsonFileOptions;
use selection_core::template_kit::{IMPORT_POST_TYPE, ImportGate, InsertedPost, TemplateKitImporter};
use selection_core::widgets::{FEATURES, MenuItem, WidgetInfo};
use selection_core::{
    BasicEmitter, Config, Hooks, Renderer, Resolver, SettingsSnapshot, WidgetRegistry, logging,
};

/// selection - Selection Lite widget bundle
#[derive(Parser, Debug)]
#[command(name = "selection", version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (uses XDG lookup if not specified)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print example configuration and exit
    #[arg(long)]
    print_example_config: bool,

    /// Validate configuration and exit (returns non-zero on errors)
    #[arg(long)]
    check_config: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered widgets
    Widgets,
    /// Print a widget's control schema as JSON
    Schema {
        /// Widget name or feature key
        widget: String,
    },
    /// Render a widget from a settings snapshot
    Render {
        /// Widget name or feature key
        widget: String,
        /// Settings snapshot as inline JSON
        #[arg(short, long, conflicts_with = "settings_file")]
        settings: Option<String>,
        /// Settings snapshot read from a JSON file
        #[arg(long)]
        settings_file: Option<PathBuf>,
        /// Navigation menus (JSON object: menu id -> items)
        #[arg(long)]
        menus: Option<PathBuf>,
        /// Print only the generated CSS
        #[arg(long)]
        css_only: bool,
    },
    /// Report active plugins the bundle already covers
    Duplicates {
        /// Admin screen id the scan runs on
        #[arg(long, default_value = "plugins")]
        screen: String,
        /// Print the snackbar payload as JSON instead of the notice
        #[arg(long)]
        snackbar: bool,
        /// Active plugin paths (e.g. rss-elementor/rss-elementor.php)
        plugins: Vec<String>,
    },
    /// Manage the site-wide custom CSS
    CustomCss {
        #[command(subcommand)]
        action: CustomCssAction,
    },
    /// Import a template kit's CSS by kit title
    ImportKit {
        /// Kit title (lowercased to form the kit slug)
        title: String,
        /// Post type of the inserted post
        #[arg(long, default_value = IMPORT_POST_TYPE)]
        post_type: String,
    },
    /// Build the breadcrumb trail for a page context
    Breadcrumbs {
        /// Page context JSON file
        context: PathBuf,
    },
    /// Show what an admin screen loads
    Screen {
        /// Screen id
        id: String,
        /// Screen base (defaults to the id)
        #[arg(long)]
        base: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum CustomCssAction {
    /// Print the stored CSS and how the front end receives it
    Show,
    /// Save CSS from a file
    Save {
        /// CSS file to store
        file: PathBuf,
        /// Settings form nonce; verified when given
        #[arg(long)]
        nonce: Option<String>,
    },
    /// Print a fresh settings form nonce
    Nonce,
    /// Render the settings tab markup
    Tab,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    logging::init(args.verbose);

    // --print-example-config doesn't need a loadable config
    if args.print_example_config {
        print!("{}", selection_core::config::DEFAULT_CONFIG_TOML);
        return ExitCode::SUCCESS;
    }

    // Load configuration using XDG lookup chain
    // If --config is specified, it must exist and be valid (no fallback)
    let load_result = match Config::find_and_load(args.config.as_deref()) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(ref source) = load_result.source {
        info!("Loaded configuration from {:?}", source);
    } else if load_result.used_defaults {
        warn!("Using default configuration (no config file found)");
    }

    let config = load_result.config;

    // Validate configuration (strict - fail on invalid values)
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    for warning in config.warnings(FEATURES) {
        warn!("{}", warning);
    }

    debug!("Configuration validated successfully");

    // --check-config: just validate and exit
    if args.check_config {
        if let Some(ref source) = load_result.source {
            println!("Configuration valid: {}", source.display());
        } else {
            println!("Configuration valid (using defaults)");
        }
        return ExitCode::SUCCESS;
    }

    let Some(command) = args.command else {
        println!("{}", config.summary());
        return ExitCode::SUCCESS;
    };

    match handle_command(&config, command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn handle_command(config: &Config, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Widgets => list_widgets(config),
        Command::Schema { widget } => print_schema(config, &widget),
        Command::Render {
            widget,
            settings,
            settings_file,
            menus,
            css_only,
        } => render(
            config,
            &widget,
            settings.as_deref(),
            settings_file.as_deref(),
            menus.as_deref(),
            css_only,
        ),
        Command::Duplicates {
            screen,
            snackbar,
            plugins,
        } => report_duplicates(config, &screen, &plugins, snackbar),
        Command::CustomCss { action } => handle_custom_css(config, action),
        Command::ImportKit { title, post_type } => import_kit(config, title, post_type),
        Command::Breadcrumbs { context } => print_breadcrumbs(&context),
        Command::Screen { id, base } => describe_screen(config, &id, base.as_deref()),
    }
}

fn list_widgets(config: &Config) -> anyhow::Result<()> {
    let registry = WidgetRegistry::new(config);
    let category = WidgetRegistry::category();
    println!("{} ({})", category.title, category.slug);
    for widget in registry.iter() {
        let info = WidgetInfo::of(widget.as_ref());
        println!(
            "  {:<32} {:<18} feature={:<8} fields={}",
            info.name, info.title, info.feature, info.fields
        );
    }
    Ok(())
}

fn print_schema(config: &Config, name: &str) -> anyhow::Result<()> {
    let registry = WidgetRegistry::new(config);
    let widget = registry
        .get(name)
        .ok_or_else(|| selection_core::Error::UnknownWidget(name.to_string()))?;
    println!("{}", serde_json::to_string_pretty(widget.schema())?);
    Ok(())
}

fn render(
    config: &Config,
    widget: &str,
    settings: Option<&str>,
    settings_file: Option<&Path>,
    menus: Option<&Path>,
    css_only: bool,
) -> anyhow::Result<()> {
    let raw = match (settings, settings_file) {
        (Some(inline), _) => inline.to_string(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?,
        (None, None) => "{}".to_string(),
    };
    let value: serde_json::Value =
        serde_json::from_str(&raw).context("settings must be a JSON object")?;
    let snapshot = SettingsSnapshot::from_json(value);

    let mut emitter = BasicEmitter::new(&config.site.home_url);
    if let Some(path) = menus {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read menus from {}", path.display()))?;
        let menus: BTreeMap<String, Vec<MenuItem>> =
            serde_json::from_str(&content).context("invalid menus file")?;
        for (id, items) in menus {
            emitter = emitter.with_menu(&id, items);
        }
    }

    let renderer = Renderer::new(
        WidgetRegistry::new(config),
        Resolver::new(config.breakpoints),
        Hooks::new(),
        Box::new(emitter),
    );
    let rendered = renderer.render(widget, &snapshot)?;

    if css_only {
        print!("{}", rendered.css);
        return Ok(());
    }

    let assets = AssetRegistry::new(&config.site);
    if let Some(widget) = renderer.registry().get(widget) {
        for asset in assets.depends_for(widget.as_ref()) {
            println!("{}", assets::tag(asset));
        }
    }
    if !rendered.css.is_empty() {
        println!("<style>\n{}</style>", rendered.css);
    }
    println!("{}", rendered.html);
    Ok(())
}

fn report_duplicates(
    config: &Config,
    screen: &str,
    plugins: &[String],
    snackbar: bool,
) -> anyhow::Result<()> {
    let screen = Screen::new(screen, screen);
    let set = DuplicateScan::new(&config.admin).run(Some(&screen), plugins, &config.features);

    if snackbar {
        match duplicates::snackbar(&set, &config.site.url) {
            Some(bar) => println!("{}", serde_json::to_string_pretty(&bar)?),
            None => println!("null"),
        }
    } else if set.is_empty() {
        println!("No redundant plugins.");
    } else {
        println!("{}", duplicates::notice_html(&set));
    }
    Ok(())
}

fn open_css_store(config: &Config) -> anyhow::Result<CustomCssStore> {
    let options = JsonFileOptions::open(&config.storage.options_path).with_context(|| {
        format!(
            "failed to open options record {}",
            config.storage.options_path.display()
        )
    })?;
    Ok(CustomCssStore::new(config, Arc::new(options))?)
}

fn handle_custom_css(config: &Config, action: CustomCssAction) -> anyhow::Result<()> {
    let store = open_css_store(config)?;
    match action {
        CustomCssAction::Show => {
            let css = store.load();
            if css.is_empty() {
                println!("/* no custom CSS */");
            } else {
                println!("{}", css);
            }
            println!("{}", serde_json::to_string_pretty(&store.stylesheet())?);
        }
        CustomCssAction::Save { file, nonce } => {
            let css = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            store.save(&css, nonce.as_deref())?;
            println!("Saved {} bytes to {}", css.len(), store.file_path().display());
        }
        CustomCssAction::Nonce => println!("{}", store.nonce()),
        CustomCssAction::Tab => {
            let hooks = Hooks::new();
            let tab = CustomCssTab::new(&config.custom_css, &hooks);
            println!("{}", tab.render(&store.load(), &store.nonce()));
        }
    }
    Ok(())
}

fn import_kit(config: &Config, title: String, post_type: String) -> anyhow::Result<()> {
    if title.trim().is_empty() {
        bail!("kit title must not be empty");
    }
    let store = open_css_store(config)?;
    let importer = TemplateKitImporter::http(&config.template_kit);
    // Running the tool locally stands in for an administrator with the
    // import plugin installed.
    let gate = ImportGate {
        can_manage_options: true,
        import_plugin_active: true,
    };
    let outcome = importer.after_insert_post(gate, &InsertedPost { post_type, title }, &store)?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn print_breadcrumbs(path: &Path) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let context: PageContext = serde_json::from_str(&content).context("invalid page context")?;
    println!(
        "{}",
        serde_json::to_string_pretty(&breadcrumbs::breadcrumbs(&context))?
    );
    Ok(())
}

fn describe_screen(config: &Config, id: &str, base: Option<&str>) -> anyhow::Result<()> {
    let screen = Screen::new(id, base.unwrap_or(id));
    let registry = AssetRegistry::new(&config.site);
    let loaded = admin::screen_assets(Some(&screen), &config.admin, &registry);
    println!("{}", serde_json::to_string_pretty(&loaded)?);
    Ok(())
}
