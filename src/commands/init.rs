use std::path::Path;

use crate::{
    InitArgs,
    config::{DEFAULT_CONFIG_FILE, RootConfig},
};

const POST_TEMPLATE: &str = include_str!("../../templates/post.html");
const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");
const SAMPLE_POST: &str = "---
title: Hello, world
date: 2024-01-01
---
# Hello, world

This is your first post. Edit `content/hello.md` and run `mdsite build`.
";

pub async fn run(args: &InitArgs) -> Result<(), anyhow::Error> {
    let path = if args.path.is_relative() {
        std::env::current_dir()?.join(&args.path)
    } else {
        args.path.clone()
    };

    if !tokio::fs::try_exists(&path).await? {
        if args.create {
            tokio::fs::create_dir_all(&path).await?;
            println!("Created directory {path}", path = path.display());
        } else {
            return Err(anyhow::anyhow!(
                "Directory does not exist: {path}",
                path = path.display()
            ));
        }
    }

    println!("Initializing site in {}", path.display());

    let config = RootConfig::default();
    let config_text = serde_yaml::to_string(&config)?;
    write_new(&path.join(DEFAULT_CONFIG_FILE), &config_text).await?;

    let templates = path.join(&config.site.templates);
    write_new(&templates.join("post.html"), POST_TEMPLATE).await?;
    write_new(&templates.join("index.html"), INDEX_TEMPLATE).await?;

    write_new(&path.join(&config.site.content).join("hello.md"), SAMPLE_POST).await?;
    tokio::fs::create_dir_all(path.join(&config.site.static_dir)).await?;

    Ok(())
}

/// Write a scaffold file, leaving any existing file untouched.
async fn write_new(path: &Path, contents: &str) -> Result<(), anyhow::Error> {
    if tokio::fs::try_exists(path).await? {
        println!("Skipping existing {}", path.display());
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await?;
    println!("Created {}", path.display());

    Ok(())
}
