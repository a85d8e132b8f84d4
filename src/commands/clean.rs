use crate::{
    CleanArgs,
    build::{Builder, base_path_from_config},
    config::RootConfig,
};

pub async fn run(args: &CleanArgs) -> Result<(), anyhow::Error> {
    let (config, config_path) = RootConfig::load_from_arg(args.config_file.as_deref())?;
    let base_path = base_path_from_config(&config_path);

    // Delete the generated site folder
    let site_path = Builder::new(config, base_path).output_dir();
    if !tokio::fs::try_exists(&site_path).await? {
        println!("Nothing to delete at {}", site_path.display());
        return Ok(());
    }

    if args.dry_run {
        println!("Would delete {}", site_path.display());
    } else {
        tokio::fs::remove_dir_all(&site_path).await?;
        println!("Deleted {}", site_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site_with_output() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("mdsite.yaml"), "site:\n  output: out\n").unwrap();
        std::fs::create_dir_all(dir.path().join("out/posts")).unwrap();
        std::fs::write(dir.path().join("out/posts/a.html"), "<p>a</p>").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_clean_dry_run_keeps_output() {
        let dir = site_with_output();
        let args = CleanArgs {
            config_file: Some(dir.path().join("mdsite.yaml")),
            dry_run: true,
        };

        run(&args).await.unwrap();
        assert!(dir.path().join("out/posts/a.html").exists());
    }

    #[tokio::test]
    async fn test_clean_deletes_output() {
        let dir = site_with_output();
        let args = CleanArgs {
            config_file: Some(dir.path().join("mdsite.yaml")),
            dry_run: false,
        };

        run(&args).await.unwrap();
        assert!(!dir.path().join("out").exists());

        // A second clean has nothing left to do
        run(&args).await.unwrap();
    }
}
