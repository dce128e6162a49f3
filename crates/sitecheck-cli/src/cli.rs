//! CLI definition using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sitecheck_types::OutputFormat;

#[derive(Parser)]
#[command(name = "sitecheck")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Facility inspection checklists, photos and scoring")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Store directory override
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Preview the areas a checklist file would import
    Import {
        /// Checklist file (.csv, .txt or .json)
        file: PathBuf,
    },

    /// Compress photos the way they are stored on an inspection
    Compress {
        /// Image files
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Write the compressed JPEGs into this folder
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Maximum width in pixels. Uses config value if not specified.
        #[arg(long)]
        max_width: Option<u32>,

        /// JPEG quality in (0, 1]. Uses config value if not specified.
        #[arg(long)]
        quality: Option<f32>,

        /// Number of parallel jobs. 0 = auto (CPU count).
        #[arg(long, short = 'j')]
        jobs: Option<usize>,
    },

    /// Record a new inspection
    Submit {
        /// Client id
        #[arg(long)]
        client: String,

        /// Site name
        #[arg(long)]
        site: String,

        /// Inspector name
        #[arg(long)]
        inspector: String,

        /// Import areas from a checklist file
        #[arg(long)]
        checklist: Option<PathBuf>,

        /// Add an area by name (repeatable)
        #[arg(long = "area", value_name = "NAME")]
        areas: Vec<String>,

        /// Score an area, e.g. "Lobby=85" (repeatable)
        #[arg(long = "score", value_name = "AREA=N")]
        scores: Vec<String>,

        /// Notes for an area, e.g. "Lobby=mats worn" (repeatable)
        #[arg(long = "notes", value_name = "AREA=TEXT")]
        notes: Vec<String>,

        /// Attach a photo to an area, e.g. "Lobby=door.jpg" (repeatable)
        #[arg(long = "photo", value_name = "AREA=PATH")]
        photos: Vec<String>,

        /// Attach every photo in a folder to an area (repeatable)
        #[arg(long = "photo-dir", value_name = "AREA=DIR")]
        photo_dirs: Vec<String>,

        /// Number of parallel compression jobs. 0 = auto (CPU count).
        #[arg(long, short = 'j')]
        jobs: Option<usize>,
    },

    /// List inspections, newest first
    List {
        /// Only this client's inspections
        #[arg(long)]
        client: Option<String>,

        /// Maximum number of inspections to show
        #[arg(long, short = 'n', default_value = "50")]
        limit: usize,
    },

    /// Show one inspection with its areas
    Show {
        /// Inspection id
        id: String,

        /// Only find the inspection if it belongs to this client
        #[arg(long)]
        client: Option<String>,
    },

    /// Show aggregate metrics
    Metrics {
        /// Only this client's inspections
        #[arg(long)]
        client: Option<String>,
    },

    /// Log in and show the matching dashboard
    Login {
        #[command(subcommand)]
        role: LoginRole,
    },

    /// Write one stored photo to a JPEG file
    ExportPhoto {
        /// Inspection id
        id: String,

        /// Area name
        area: String,

        /// Photo number within the area, starting at 1
        number: usize,

        /// Output file
        #[arg(long, short = 'o')]
        output: PathBuf,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set store directory
        #[arg(long)]
        set_store_dir: Option<PathBuf>,

        /// Set key holding the inspection collection
        #[arg(long)]
        set_store_key: Option<String>,

        /// Set client roster TOML file
        #[arg(long)]
        set_roster: Option<PathBuf>,

        /// Set manager password
        #[arg(long)]
        set_manager_password: Option<String>,

        /// Set maximum photo width
        #[arg(long)]
        set_max_width: Option<u32>,

        /// Set photo quality in (0, 1]
        #[arg(long)]
        set_quality: Option<f32>,

        /// Set parallel photo jobs (0 = auto)
        #[arg(long)]
        set_jobs: Option<usize>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Subcommand)]
pub enum LoginRole {
    /// Client login: own inspections and metrics
    Client {
        /// Client id
        id: String,

        #[arg(long, short = 'p')]
        password: String,
    },

    /// Manager login: every client's inspections
    Manager {
        /// Manager name
        name: String,

        #[arg(long, short = 'p')]
        password: String,
    },
}
