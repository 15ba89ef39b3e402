use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "tif-mean")]
#[command(about = "Average a folder of single-band GeoTIFFs pixel by pixel")]
#[command(version)]
pub struct Args {
    /// Folder containing the input .tif rasters
    #[arg(short, long, value_name = "DIR", default_value = "")]
    pub input_dir: String,

    /// Output GeoTIFF path (Float32, overwritten if present)
    #[arg(short, long, value_name = "FILE", default_value = "")]
    pub output: String,

    /// Leave nodata pixels out of the mean instead of averaging them as values
    #[arg(long)]
    pub skip_nodata: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
