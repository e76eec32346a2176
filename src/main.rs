use blogger_to_hugo::imaging::ThumbnailSize;
use blogger_to_hugo::layout::OutputLayout;
use blogger_to_hugo::migrate::{self, MigrateSettings};
use blogger_to_hugo::{config, output};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "blogger-to-hugo")]
#[command(about = "Migrate a Blogger export into Hugo content")]
#[command(long_about = "\
Migrate a Blogger export into Hugo content

Every post in the export becomes a markdown file with TOML front matter.
Images embedded in posts are downloaded, and images linking to a larger
version of themselves also get a thumbnail:

  OUTPUT_FOLDER/
  ├── 2020-03-04-hello-world.md                 # one file per post
  └── images/
      ├── 2020-03-04-hello-world-pic.jpg        # downloaded images
      └── thumbnails/
          └── 2020-03-04-hello-world-pic.jpg    # linked images only

OUTPUT_FOLDER must not exist yet. Nothing is ever overwritten: two files
with the same name stop the migration.")]
#[command(version)]
struct Cli {
    /// Bounding box for thumbnails [default: 512x384]
    #[arg(long, value_name = "WIDTHxHEIGHT")]
    thumbnail_size: Option<ThumbnailSize>,

    /// Optional config.toml with thumbnail and HTTP settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Blogger export file (Atom XML)
    blogger_xml_file: PathBuf,

    /// Folder to create for the Hugo content
    output_folder: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_optional_config(cli.config.as_deref())?;
    let settings = MigrateSettings {
        thumbnail_size: cli.thumbnail_size.unwrap_or_else(|| config.thumbnail_size()),
        http: config.http,
    };

    if !cli.blogger_xml_file.is_file() {
        return Err(format!("File \"{}\" does not exist", cli.blogger_xml_file.display()).into());
    }
    let layout = OutputLayout::create(&cli.output_folder)?;

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_event(&event);
        }
    });
    let result = migrate::migrate(&cli.blogger_xml_file, &layout, &settings, Some(tx));
    printer
        .join()
        .map_err(|_| "progress printer thread panicked")?;

    let summary = result?;
    output::print_summary(&summary);
    Ok(())
}
