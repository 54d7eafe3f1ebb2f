use crate::CliError;
use clap::Parser;
use fractal_tree_lib::{DEFAULT_EPSILONS, TreeParams};
use geo::Coord;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Two-letter short flags from older option files, with their long form
const LEGACY_SHORT_FLAGS: &[(&str, &str)] = &[
    ("-la", "--left-angle"),
    ("-ra", "--right-angle"),
    ("-rl", "--root-length"),
];

/// Rewrite a legacy two-letter short flag to its long form
fn expand_legacy_flag(arg: OsString) -> OsString {
    LEGACY_SHORT_FLAGS
        .iter()
        .find(|(short, _)| arg == *short)
        .map_or(arg, |(_, long)| OsString::from(*long))
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None, args_override_self = true)]
/// Fractal Tree - build a self-similar binary tree and estimate its fractal dimension
pub struct Settings {
    /// Tree depth (number of levels, the root included)
    #[arg(short, long, default_value = "10", alias = "tree_depth")]
    pub depth: u32,

    /// Angle in degrees for left/down branches
    #[arg(long, alias = "left_angle", default_value = "90.0", allow_negative_numbers = true)]
    pub left_angle: f64,

    /// Angle in degrees for right/up branches
    #[arg(long, alias = "right_angle", default_value = "90.0", allow_negative_numbers = true)]
    pub right_angle: f64,

    /// Angle in degrees for the root segment (90 points straight up)
    #[arg(long, alias = "root_angle", default_value = "90.0", allow_negative_numbers = true)]
    pub root_angle: f64,

    /// Length of the root segment
    #[arg(long, alias = "root_length", default_value = "1.0")]
    pub root_length: f64,

    /// Scale new segment lengths by this factor
    #[arg(short, long, alias = "scale_factor", default_value = "0.6")]
    pub scale_factor: f64,

    /// Coordinates of the root segment start
    #[arg(
        short,
        long,
        num_args = 2,
        value_names = ["X", "Y"],
        default_values_t = [5.0, 0.0],
        allow_negative_numbers = true
    )]
    pub root: Vec<f64>,

    /// Covering radii for the dimension estimate (comma separated)
    #[arg(short = 'e', long = "epsilon", value_delimiter = ',')]
    pub epsilons: Vec<f64>,

    /// Read additional options from a file (whitespace separated, command line wins)
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Write the tree parameters to an options file
    #[arg(long, value_name = "FILE")]
    pub save_options: Option<PathBuf>,

    /// Write every segment, in pre-order, as JSON
    #[arg(long, value_name = "FILE")]
    pub dump_segments: Option<PathBuf>,

    /// Print the report as JSON instead of text
    #[arg(long, default_value = "false")]
    pub json: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,
}

impl Settings {
    /// Parse the process arguments, merging in an options file if one is given
    pub fn from_cli() -> Result<Self, CliError> {
        Self::load_from(std::env::args_os())
    }

    /// Parse `args` (program name first), merging in an options file if one is given
    ///
    /// Options from the file are placed before the command-line options, so
    /// anything also given on the command line overrides the file.
    pub fn load_from<I, T>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args: Vec<OsString> = args
            .into_iter()
            .map(|arg| expand_legacy_flag(arg.into()))
            .collect();
        let settings = Self::try_parse_from(&args)?;

        let Some(path) = settings.file.clone() else {
            return Ok(settings);
        };

        let contents = std::fs::read_to_string(&path).map_err(|source| CliError::OptionsFile {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "merging options file");

        let program = args
            .first()
            .cloned()
            .unwrap_or_else(|| OsString::from("fractal-tree"));
        let merged = std::iter::once(program)
            .chain(
                contents
                    .split_whitespace()
                    .map(|token| expand_legacy_flag(OsString::from(token))),
            )
            .chain(args.into_iter().skip(1));

        Ok(Self::try_parse_from(merged)?)
    }

    /// Root start point (the last pair given wins)
    pub fn root_start(&self) -> Coord<f64> {
        match self.root.as_slice() {
            [.., x, y] => Coord { x: *x, y: *y },
            _ => TreeParams::default().root_start,
        }
    }

    /// Tree parameters described by these settings
    pub fn tree_params(&self) -> TreeParams {
        TreeParams {
            root_start: self.root_start(),
            root_length: self.root_length,
            root_angle_deg: self.root_angle,
            left_angle_deg: self.left_angle,
            right_angle_deg: self.right_angle,
            scale_factor: self.scale_factor,
            depth: self.depth,
        }
    }

    /// Radii to estimate with, falling back to the library defaults
    pub fn epsilons(&self) -> Vec<f64> {
        if self.epsilons.is_empty() {
            DEFAULT_EPSILONS.to_vec()
        } else {
            self.epsilons.clone()
        }
    }
}

/// Render tree parameters as options-file text
pub fn options_text(params: &TreeParams) -> String {
    format!(
        "--depth {} --left-angle {} --right-angle {} --root-angle {} --root-length {} --scale-factor {} --root {} {}\n",
        params.depth,
        params.left_angle_deg,
        params.right_angle_deg,
        params.root_angle_deg,
        params.root_length,
        params.scale_factor,
        params.root_start.x,
        params.root_start.y,
    )
}

/// Write tree parameters to an options file readable with `--file`
pub fn save_options(path: &Path, params: &TreeParams) -> Result<(), CliError> {
    std::fs::write(path, options_text(params)).map_err(|source| CliError::OptionsFile {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "saved options");
    Ok(())
}
