use std::path::Path;
use std::time::Instant;

use log::{debug, info};
use rayon::prelude::*;

use super::assets::copy_public_files;
use super::context::BuildContext;
use super::output::copy_destination;
use super::page::{PageOutcome, PageRenderer};
use crate::directory::{discover_files, is_reserved_name};
use crate::hooks::{HookEngine, HostRoots};
use crate::layout::{read_layout, LayoutRenderer};
use crate::utils::error::Result;
use crate::utils::fs::{copy_file, create_directory};
use crate::utils::path::make_relative;

/// Counts reported at the end of a build
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildStats {
    pub rendered: usize,
    pub copied: usize,
    pub assets: usize,
}

/// Build the whole site into the configured destination
pub fn build_site(ctx: &BuildContext) -> Result<BuildStats> {
    let start_time = Instant::now();
    let config = &ctx.config;
    info!(
        "Building site from {} into {}",
        config.source.display(),
        config.destination.display()
    );

    let pages = discover_files(&config.pages_dir())?;
    let stats = run_build(ctx, |renderer| {
        let (assets, outcomes) = ctx.pool().install(|| {
            rayon::join(
                || copy_public_files(&config.public_dir(), &config.destination),
                || {
                    pages
                        .par_iter()
                        .map(|page| renderer.render(page))
                        .collect::<Vec<_>>()
                },
            )
        });

        let mut stats = BuildStats {
            assets: assets?,
            ..BuildStats::default()
        };
        for outcome in outcomes {
            stats.count(outcome?);
        }
        Ok(stats)
    })?;

    info!(
        "Built {} pages, copied {} files and {} static assets in {:.2?}",
        stats.rendered,
        stats.copied,
        stats.assets,
        start_time.elapsed()
    );
    Ok(stats)
}

/// Rebuild after `path` changed.
///
/// A page is rendered on its own and a static asset is copied on its own,
/// each with the full hook lifecycle. Anything else (layouts, hooks, new
/// files outside both trees) rebuilds the whole site.
pub fn rebuild_file(ctx: &BuildContext, path: &Path) -> Result<BuildStats> {
    let config = &ctx.config;
    let pages_dir = config.pages_dir();
    let public_dir = config.public_dir();

    if !path.is_file() {
        return build_site(ctx);
    }

    if make_relative(path, &pages_dir).is_some() {
        let reserved = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(is_reserved_name)
            .unwrap_or(false);
        if reserved {
            debug!("Layout {} changed, rebuilding everything", path.display());
            return build_site(ctx);
        }

        info!("Rebuilding {}", path.display());
        return run_build(ctx, |renderer| {
            let mut stats = BuildStats::default();
            stats.count(renderer.render(path)?);
            Ok(stats)
        });
    }

    if make_relative(path, &public_dir).is_some() {
        info!("Copying {}", path.display());
        return run_build(ctx, |_| {
            copy_file(path, copy_destination(path, &public_dir, &config.destination))?;
            Ok(BuildStats {
                assets: 1,
                ..BuildStats::default()
            })
        });
    }

    build_site(ctx)
}

/// Run `body` between a fresh hook lifecycle: load, `OnStart`, `OnFinish`,
/// close. `body` only returns once all of its writes are done.
fn run_build<F>(ctx: &BuildContext, body: F) -> Result<BuildStats>
where
    F: FnOnce(&PageRenderer) -> Result<BuildStats>,
{
    let config = &ctx.config;
    ctx.warnings.reset();
    create_directory(&config.destination)?;

    let mut hooks = HookEngine::new(
        config.hooks_path(),
        HostRoots::new(&config.source, &config.destination),
    );
    hooks.load()?;
    hooks.start()?;

    let layout = LayoutRenderer::new(
        read_layout(&config.pages_dir(), &ctx.warnings)?,
        config.base_url.as_str(),
        ctx.registry.clone(),
        ctx.warnings.clone(),
    )?;

    let stats = body(&PageRenderer::new(ctx, &hooks, &layout))?;

    hooks.finish()?;
    hooks.close();
    Ok(stats)
}

impl BuildStats {
    fn count(&mut self, outcome: PageOutcome) {
        match outcome {
            PageOutcome::Rendered(_) => self.rendered += 1,
            PageOutcome::Copied(_) => self.copied += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn site(tmp: &TempDir) -> PathBuf {
        let root = tmp.path().join("site");
        fs::create_dir_all(root.join("pages")).unwrap();
        root
    }

    fn context(root: &Path, out: &Path) -> BuildContext {
        let config = Config {
            source: root.to_path_buf(),
            destination: out.to_path_buf(),
            ..Config::default()
        };
        BuildContext::new(config).unwrap()
    }

    #[test]
    fn test_build_markdown_into_layout() {
        let tmp = TempDir::new().unwrap();
        let root = site(&tmp);
        let out = tmp.path().join("dist");
        fs::write(root.join("pages/index.md"), "---\ntitle: Hi\n---\n# Hello").unwrap();
        fs::write(
            root.join("pages/_layout.html"),
            "<html><base href=\"{{ Meta.BaseURL }}\"><body><slot/></body></html>",
        )
        .unwrap();

        let stats = build_site(&context(&root, &out)).unwrap();

        assert_eq!(stats.rendered, 1);
        let html = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(html.starts_with("<html><base href=\"/\"><body>"));
        assert!(html.contains("Hello</h1>"));
        assert!(!html.contains("title: Hi"));
        assert!(!html.contains("<slot"));
        assert!(!out.join("_layout.html").exists());
    }

    #[test]
    fn test_build_copies_public_and_unknown_pages() {
        let tmp = TempDir::new().unwrap();
        let root = site(&tmp);
        let out = tmp.path().join("dist");
        fs::create_dir_all(root.join("public/img")).unwrap();
        fs::write(root.join("public/img/logo.svg"), "<svg/>").unwrap();
        fs::write(root.join("pages/feed.xml"), "<rss/>").unwrap();
        fs::write(root.join("pages/about.html"), "<p>About</p>").unwrap();

        let stats = build_site(&context(&root, &out)).unwrap();

        assert_eq!(
            stats,
            BuildStats {
                rendered: 1,
                copied: 1,
                assets: 1
            }
        );
        assert_eq!(fs::read_to_string(out.join("feed.xml")).unwrap(), "<rss/>");
        assert_eq!(fs::read_to_string(out.join("about.html")).unwrap(), "<p>About</p>");
        assert!(out.join("img/logo.svg").is_file());
    }

    #[test]
    fn test_hooks_rename_and_fill_data() {
        let tmp = TempDir::new().unwrap();
        let root = site(&tmp);
        let out = tmp.path().join("dist");
        fs::create_dir_all(root.join("pages/blog")).unwrap();
        fs::create_dir_all(root.join("hooks")).unwrap();
        fs::write(root.join("pages/blog/post.md"), "Post").unwrap();
        fs::write(root.join("pages/index.md"), "Home").unwrap();
        fs::write(root.join("pages/_layout.html"), "<slot/>|{% if Data.tag %}{{ Data.tag }}{% endif %}").unwrap();
        fs::write(
            root.join("hooks/a.rhai"),
            r#"
let ForFile = "blog/post.md";
fn Writer(input) {
    #{ data: #{ tag: "x" }, name: "posts/first.html" }
}
"#,
        )
        .unwrap();

        build_site(&context(&root, &out)).unwrap();

        let post = fs::read_to_string(out.join("posts/first.html")).unwrap();
        assert!(post.contains("<p>Post</p>"));
        assert!(post.ends_with("|x"));
        assert!(!out.join("blog/post.html").exists());

        let index = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(index.ends_with("|"));
    }

    #[test]
    fn test_on_finish_hook_writes_extra_output() {
        let tmp = TempDir::new().unwrap();
        let root = site(&tmp);
        let out = tmp.path().join("dist");
        fs::create_dir_all(root.join("hooks")).unwrap();
        fs::write(root.join("pages/index.md"), "Home").unwrap();
        fs::write(root.join("pages/about.md"), "About").unwrap();
        fs::write(
            root.join("hooks/sitemap.rhai"),
            r#"
fn OnFinish() {
    let text = "";
    for page in files(workingdir() + "/pages") {
        text += page + "\n";
    }
    write_file("sitemap.txt", text);
}
"#,
        )
        .unwrap();

        build_site(&context(&root, &out)).unwrap();

        assert_eq!(fs::read_to_string(out.join("sitemap.txt")).unwrap(), "about.md\nindex.md\n");
        assert!(out.join("index.html").exists());
    }

    #[test]
    fn test_hook_error_fails_build() {
        let tmp = TempDir::new().unwrap();
        let root = site(&tmp);
        fs::create_dir_all(root.join("hooks")).unwrap();
        fs::write(root.join("pages/index.md"), "Home").unwrap();
        fs::write(root.join("hooks/bad.rhai"), "fn OnStart() { throw \"nope\"; }").unwrap();

        let err = build_site(&context(&root, &tmp.path().join("dist"))).unwrap_err();
        assert!(err.to_string().contains("bad.rhai"));
    }

    #[test]
    fn test_malformed_front_matter_fails_build() {
        let tmp = TempDir::new().unwrap();
        let root = site(&tmp);
        fs::write(root.join("pages/index.md"), "---\ntitle: [oops\n---\nbody").unwrap();

        let err = build_site(&context(&root, &tmp.path().join("dist"))).unwrap_err();
        assert!(err.to_string().contains("index.md"));
    }

    #[test]
    fn test_rebuild_single_page() {
        let tmp = TempDir::new().unwrap();
        let root = site(&tmp);
        let out = tmp.path().join("dist");
        fs::write(root.join("pages/a.md"), "A").unwrap();
        fs::write(root.join("pages/b.md"), "B").unwrap();
        let ctx = context(&root, &out);
        build_site(&ctx).unwrap();

        fs::write(root.join("pages/a.md"), "A2").unwrap();
        fs::remove_file(out.join("b.html")).unwrap();
        let stats = rebuild_file(&ctx, &root.join("pages/a.md")).unwrap();

        assert_eq!(stats.rendered, 1);
        assert!(fs::read_to_string(out.join("a.html")).unwrap().contains("A2"));
        assert!(!out.join("b.html").exists());
    }

    #[test]
    fn test_rebuild_layout_rebuilds_everything() {
        let tmp = TempDir::new().unwrap();
        let root = site(&tmp);
        let out = tmp.path().join("dist");
        fs::write(root.join("pages/a.md"), "A").unwrap();
        fs::write(root.join("pages/b.md"), "B").unwrap();
        let ctx = context(&root, &out);
        build_site(&ctx).unwrap();

        fs::write(root.join("pages/_layout.html"), "<main><slot/></main>").unwrap();
        let stats = rebuild_file(&ctx, &root.join("pages/_layout.html")).unwrap();

        assert_eq!(stats.rendered, 2);
        assert!(fs::read_to_string(out.join("b.html")).unwrap().starts_with("<main>"));
    }

    #[test]
    fn test_livereload_only_when_serving() {
        let tmp = TempDir::new().unwrap();
        let root = site(&tmp);
        let out = tmp.path().join("dist");
        fs::write(root.join("pages/index.md"), "Home").unwrap();

        build_site(&context(&root, &out)).unwrap();
        assert!(!fs::read_to_string(out.join("index.html")).unwrap().contains("WebSocket"));

        let mut ctx = context(&root, &out);
        ctx.config.serve = true;
        build_site(&ctx).unwrap();
        assert!(fs::read_to_string(out.join("index.html")).unwrap().contains("WebSocket"));
    }
}
