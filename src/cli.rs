use crate::config::Config;
use crate::render::TileProvider;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "species-map")]
#[command(
    about = "Recover fused spreadsheet coordinates, validate species against GBIF and render interactive maps",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (default: ~/.config/species-map/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recover coordinates, validate species and render a status map
    Validate {
        /// Input spreadsheet (xlsx/xls/ods)
        #[arg(required = true)]
        input: PathBuf,

        /// Output HTML map
        #[arg(short, long, default_value = "species_validation_map.html")]
        output: PathBuf,

        #[command(flatten)]
        sheet: SheetArgs,

        #[command(flatten)]
        layout: LayoutArgs,

        #[command(flatten)]
        region: RegionArgs,

        #[command(flatten)]
        map: MapArgs,

        /// Coordinate column
        #[arg(long)]
        coordinate_column: Option<String>,

        /// Also write the status table as an Excel workbook
        #[arg(long)]
        table: Option<PathBuf>,

        /// Also write the validation results as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Map GBIF occurrences of every species in the spreadsheet
    Occurrences {
        /// Input spreadsheet (xlsx/xls/ods)
        #[arg(required = true)]
        input: PathBuf,

        /// Output HTML map
        #[arg(short, long, default_value = "gbif_occurrences_map.html")]
        output: PathBuf,

        #[command(flatten)]
        sheet: SheetArgs,

        #[command(flatten)]
        region: RegionArgs,

        /// Maximum occurrences per species
        #[arg(short, long)]
        limit: Option<u32>,

        /// WKT polygon restricting the search area
        #[arg(long)]
        geometry: Option<String>,
    },

    /// Map rows that already have numeric latitude/longitude columns
    Plot {
        /// Input spreadsheet (xlsx/xls/ods)
        #[arg(required = true)]
        input: PathBuf,

        /// Output HTML map
        #[arg(short, long, default_value = "species_map.html")]
        output: PathBuf,

        #[command(flatten)]
        sheet: SheetArgs,

        #[command(flatten)]
        map: MapArgs,

        /// Latitude column
        #[arg(long)]
        lat_column: Option<String>,

        /// Longitude column
        #[arg(long)]
        lon_column: Option<String>,
    },

    /// Decode fused coordinate strings, e.g. -1503333-48446667
    Parse {
        #[arg(required = true, allow_hyphen_values = true)]
        values: Vec<String>,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Show or create the config file
    Config {
        /// Print the effective configuration
        #[arg(long)]
        show: bool,

        /// Write a config file with default values
        #[arg(long)]
        init: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct SheetArgs {
    /// Worksheet name (default: first sheet)
    #[arg(long)]
    pub sheet: Option<String>,

    /// Species name column
    #[arg(long)]
    pub species_column: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct LayoutArgs {
    /// Integer digits of the latitude part
    #[arg(long)]
    pub lat_digits: Option<usize>,

    /// Integer digits of the longitude part
    #[arg(long)]
    pub lon_digits: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub struct RegionArgs {
    /// ISO country code for occurrence filtering
    #[arg(short, long, conflicts_with = "all_regions")]
    pub region: Option<String>,

    /// Do not filter occurrences by country
    #[arg(long)]
    pub all_regions: bool,
}

#[derive(Args, Debug, Default)]
pub struct MapArgs {
    /// Base map tiles
    #[arg(long, value_enum)]
    pub tiles: Option<TileProvider>,

    /// Initial zoom level
    #[arg(long)]
    pub zoom: Option<u8>,

    /// Center the map on the plotted points
    #[arg(long)]
    pub center_on_data: bool,
}

impl SheetArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(sheet) = &self.sheet {
            config.sheet = Some(sheet.clone());
        }
        if let Some(column) = &self.species_column {
            config.columns.species = column.clone();
        }
    }
}

impl LayoutArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(digits) = self.lat_digits {
            config.layout.latitude_digits = digits;
        }
        if let Some(digits) = self.lon_digits {
            config.layout.longitude_digits = digits;
        }
    }
}

impl RegionArgs {
    pub fn apply(&self, config: &mut Config) {
        if self.all_regions {
            config.gbif.region = None;
        } else if let Some(region) = &self.region {
            config.gbif.region = Some(region.trim().to_uppercase());
        }
    }
}

impl MapArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(tiles) = self.tiles {
            config.map.tiles = tiles;
        }
        if let Some(zoom) = self.zoom {
            config.map.zoom = zoom;
        }
        if self.center_on_data {
            config.map.center_on_data = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_leading_hyphen() {
        let cli = Cli::try_parse_from([
            "species-map",
            "parse",
            "--lon-digits",
            "2",
            "-1503333-48446667",
        ])
        .unwrap();
        match cli.command {
            Commands::Parse { values, layout } => {
                assert_eq!(values, vec!["-1503333-48446667"]);
                assert_eq!(layout.lon_digits, Some(2));
            }
            _ => panic!("expected parse command"),
        }
    }

    #[test]
    fn test_validate_overrides() {
        let cli = Cli::try_parse_from([
            "species-map",
            "validate",
            "base.xlsx",
            "--species-column",
            "ESPECIE",
            "--region",
            "pe",
            "--tiles",
            "carto-db-positron",
        ])
        .unwrap();
        let Commands::Validate { sheet, region, map, .. } = cli.command else {
            panic!("expected validate command");
        };

        let mut config = Config::default();
        sheet.apply(&mut config);
        region.apply(&mut config);
        map.apply(&mut config);

        assert_eq!(config.columns.species, "ESPECIE");
        assert_eq!(config.region(), Some("PE"));
        assert_eq!(config.map.tiles, TileProvider::CartoDbPositron);
    }

    #[test]
    fn test_region_flags_conflict() {
        let result = Cli::try_parse_from([
            "species-map",
            "occurrences",
            "base.xlsx",
            "--region",
            "BR",
            "--all-regions",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_all_regions_clears_filter() {
        let args = RegionArgs {
            region: None,
            all_regions: true,
        };
        let mut config = Config::default();
        args.apply(&mut config);
        assert_eq!(config.region(), None);
    }
}
