use crate::{
    BuildArgs,
    build::{Builder, base_path_from_config},
    config::RootConfig,
};

pub async fn run(args: &BuildArgs) -> Result<(), anyhow::Error> {
    let (config, config_path) = RootConfig::load_from_arg(args.config_file.as_deref())?;

    // Relative paths in the config are relative to the config file
    let base_path = base_path_from_config(&config_path);

    let builder = Builder::new(config, base_path);
    let result = builder.build()?;

    println!(
        "Built site to {} ({} posts, {} static files, {} other files copied, {} skipped)",
        result.output_dir.display(),
        result.posts,
        result.static_files,
        result.copied_files,
        result.skipped_files
    );

    Ok(())
}
