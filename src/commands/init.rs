//! Initialize a new blog directory

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::BlogConfig;

/// Initialize a new site in the given directory.
///
/// Existing `_config.yml` and posts are left alone.
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config = BlogConfig::default();
    let posts_dir = target_dir.join(&config.posts_dir);
    fs::create_dir_all(&posts_dir)?;

    let config_path = target_dir.join("_config.yml");
    if !config_path.exists() {
        let content = format!("# mdposts configuration\n{}", config.to_yaml()?);
        fs::write(&config_path, content)?;
        tracing::info!("Created {:?}", config_path);
    }

    let sample_path = posts_dir.join("hello-world.md");
    if !sample_path.exists() {
        let now = chrono::Local::now();
        let sample_post = format!(
            r#"---
title: Hello World
date: {}
---

Welcome! This is your first post. Edit `{}` or create another one:

```bash
$ mdposts new "My New Post"
```

Then start the server and open `/posts/hello-world`:

```bash
$ mdposts server
```
"#,
            now.format("%Y-%m-%d %H:%M:%S"),
            sample_path.display()
        );
        fs::write(&sample_path, sample_post)?;
        tracing::info!("Created {:?}", sample_path);
    }

    Ok(())
}
