mod app;
mod dataset;
mod layout;
mod registry;
mod util;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON dataset of nodes and connections; defaults to the built-in sample
    #[arg(long)]
    dataset: Option<String>,

    /// Radius of the initial circular layout, in world units
    #[arg(long, default_value_t = 3.0)]
    layout_radius: f32,
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "forcelink",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::ForceLinkApp::new(
                cc,
                args.dataset.clone(),
                args.layout_radius,
            )))
        }),
    )
}
