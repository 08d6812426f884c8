use std::path::{Component, Path, PathBuf};

use log::{debug, info};
use rhai::{Array, Dynamic, Engine, EvalAltResult, ImmutableString, Map};
use walkdir::WalkDir;

use crate::utils::fs::write_file_atomic;

/// Directories a hook script may touch through the host API
#[derive(Debug, Clone, Default)]
pub struct HostRoots {
    /// Site root; `read_file` and env files resolve below it
    pub site: PathBuf,
    /// Output directory; `write_file` resolves below it
    pub output: PathBuf,
}

impl HostRoots {
    pub fn new(site: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        HostRoots {
            site: site.into(),
            output: output.into(),
        }
    }
}

/// Register the host functions every hook script can call:
///
/// - `json_decode(text)` / `json_encode(value)`
/// - `yaml_decode(text)` / `yaml_encode(value)`
/// - `files(dir)`: files below `dir`, relative to it, symlinks skipped
/// - `read_file(path)`: text of a file below the site root
/// - `write_file(path, text)`: write a file below the output directory
/// - `get_env(key)`: environment variable or `""`
/// - `get_env(env_file, key)`: same, falling back to a dotenv file below
///   the site root
/// - `http_get(url)` / `http_post(url, body)`: `#{ status, body }`
/// - `workingdir()`: the site root, `""` for the current directory
///
/// String helpers (`split`, `replace`, `trim`, `contains`...) are Rhai's own.
pub fn register_host_api(engine: &mut Engine, roots: &HostRoots) {
    engine.register_fn("json_decode", json_decode);
    engine.register_fn("json_encode", json_encode);
    engine.register_fn("yaml_decode", yaml_decode);
    engine.register_fn("yaml_encode", yaml_encode);
    engine.register_fn("files", files);
    engine.register_fn("get_env", |key: ImmutableString| {
        std::env::var(key.as_str()).unwrap_or_default()
    });

    let site = roots.site.clone();
    engine.register_fn("get_env", move |env_file: ImmutableString, key: ImmutableString| {
        get_env_from(&site.join(env_file.as_str()), key.as_str())
    });

    let site = roots.site.clone();
    engine.register_fn("read_file", move |path: ImmutableString| read_file(&site, path.as_str()));

    let output = roots.output.clone();
    engine.register_fn("write_file", move |path: ImmutableString, text: ImmutableString| {
        write_file(&output, path.as_str(), text.as_str())
    });

    engine.register_fn("http_get", |url: ImmutableString| {
        http_request(ureq::get(url.as_str()), None)
    });
    engine.register_fn("http_post", |url: ImmutableString, body: ImmutableString| {
        http_request(ureq::post(url.as_str()), Some(body.as_str()))
    });

    let working_dir = working_dir(&roots.site);
    engine.register_fn("workingdir", move || working_dir.clone());

    engine.on_print(|text| info!("{}", text));
    engine.on_debug(|text, source, pos| match source {
        Some(source) => debug!("{} @ {:?}: {}", source, pos, text),
        None => debug!("{:?}: {}", pos, text),
    });
}

fn working_dir(source_root: &Path) -> String {
    if source_root == Path::new(".") || source_root.as_os_str().is_empty() {
        String::new()
    } else {
        source_root.to_string_lossy().into_owned()
    }
}

fn json_decode(text: ImmutableString) -> Result<Dynamic, Box<EvalAltResult>> {
    let value: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| format!("json_decode: {}", e))?;
    rhai::serde::to_dynamic(value)
}

fn json_encode(value: Dynamic) -> Result<String, Box<EvalAltResult>> {
    serde_json::to_string(&value).map_err(|e| format!("json_encode: {}", e).into())
}

fn yaml_decode(text: ImmutableString) -> Result<Dynamic, Box<EvalAltResult>> {
    let value: serde_json::Value =
        serde_yaml::from_str(&text).map_err(|e| format!("yaml_decode: {}", e))?;
    rhai::serde::to_dynamic(value)
}

fn yaml_encode(value: Dynamic) -> Result<String, Box<EvalAltResult>> {
    serde_yaml::to_string(&value).map_err(|e| format!("yaml_encode: {}", e).into())
}

fn files(dir: ImmutableString) -> Result<Array, Box<EvalAltResult>> {
    list_relative_files(Path::new(dir.as_str()))
        .map(|paths| paths.into_iter().map(Dynamic::from).collect())
        .map_err(|e| format!("files({}): {}", dir, e).into())
}

fn list_relative_files(dir: &Path) -> walkdir::Result<Vec<String>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative: PathBuf = entry.path().strip_prefix(dir).unwrap_or(entry.path()).to_path_buf();
        paths.push(relative.to_string_lossy().replace('\\', "/"));
    }
    Ok(paths)
}

/// Join a script-supplied relative path onto `root`.
///
/// Absolute paths and `..` are refused so scripts stay inside `root`.
fn confined(root: &Path, path: &str) -> Result<PathBuf, String> {
    let mut joined = root.to_path_buf();
    for component in Path::new(path).components() {
        match component {
            Component::Normal(part) => joined.push(part),
            Component::CurDir => {}
            _ => return Err(format!("{} escapes {}", path, root.display())),
        }
    }
    if joined == root {
        return Err(format!("{:?} does not name a file", path));
    }
    Ok(joined)
}

fn read_file(site: &Path, path: &str) -> Result<String, Box<EvalAltResult>> {
    let full = confined(site, path).map_err(|e| format!("read_file: {}", e))?;
    std::fs::read_to_string(&full)
        .map_err(|e| format!("read_file({}): {}", path, e).into())
}

fn write_file(output: &Path, path: &str, text: &str) -> Result<(), Box<EvalAltResult>> {
    let full = confined(output, path).map_err(|e| format!("write_file: {}", e))?;
    debug!("Hook writing {}", full.display());
    write_file_atomic(&full, text.as_bytes())
        .map_err(|e| format!("write_file({}): {}", path, e).into())
}

/// The process environment wins; a missing or unreadable env file only
/// means there is no fallback
fn get_env_from(env_file: &Path, key: &str) -> String {
    if let Ok(value) = std::env::var(key) {
        return value;
    }

    let entries = match dotenvy::from_path_iter(env_file) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("No env file at {}: {}", env_file.display(), e);
            return String::new();
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .find(|(name, _)| name == key)
        .map(|(_, value)| value)
        .unwrap_or_default()
}

/// Error statuses are returned to the script; only transport failures raise
fn http_request(request: ureq::Request, body: Option<&str>) -> Result<Map, Box<EvalAltResult>> {
    let url = request.url().to_string();
    let outcome = match body {
        Some(body) => request.send_string(body),
        None => request.call(),
    };
    let response = match outcome {
        Ok(response) => response,
        Err(ureq::Error::Status(_, response)) => response,
        Err(e) => return Err(format!("http {}: {}", url, e).into()),
    };

    let status = response.status() as i64;
    let text = response
        .into_string()
        .map_err(|e| format!("http {}: {}", url, e))?;

    let mut result = Map::new();
    result.insert("status".into(), Dynamic::from(status));
    result.insert("body".into(), Dynamic::from(text));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use tempfile::TempDir;

    fn engine(root: &Path) -> Engine {
        let mut engine = Engine::new();
        register_host_api(&mut engine, &HostRoots::new(root, root.join("dist")));
        engine
    }

    #[test]
    fn test_json_round_trip_in_script() {
        let engine = engine(Path::new("."));
        let out: String = engine
            .eval(r#"let v = json_decode("{\"a\":[1,2]}"); v.b = 3; json_encode(v)"#)
            .unwrap();
        assert_eq!(out, r#"{"a":[1,2],"b":3}"#);
    }

    #[test]
    fn test_json_decode_error_is_a_script_error() {
        let engine = engine(Path::new("."));
        assert!(engine.eval::<Dynamic>(r#"json_decode("{")"#).is_err());
    }

    #[test]
    fn test_yaml_in_script() {
        let engine = engine(Path::new("."));
        let title: String = engine
            .eval(r#"let v = yaml_decode("title: Hello\ntags:\n  - a\n  - b\n"); v.title + ":" + v.tags.len()"#)
            .unwrap();
        assert_eq!(title, "Hello:2");

        let out: String = engine.eval(r#"yaml_encode(#{ name: "x" })"#).unwrap();
        assert_eq!(out.trim(), "name: x");
    }

    #[test]
    fn test_workingdir() {
        assert_eq!(engine(Path::new(".")).eval::<String>("workingdir()").unwrap(), "");
        assert_eq!(engine(Path::new("site")).eval::<String>("workingdir()").unwrap(), "site");
    }

    #[test]
    fn test_files_lists_relative_paths() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("posts/2024")).unwrap();
        fs::write(tmp.path().join("posts/a.md"), "").unwrap();
        fs::write(tmp.path().join("posts/2024/b.md"), "").unwrap();

        let found = list_relative_files(&tmp.path().join("posts")).unwrap();
        assert_eq!(found, vec!["2024/b.md", "a.md"]);
    }

    #[test]
    fn test_files_missing_dir_is_error() {
        let engine = engine(Path::new("."));
        assert!(engine.eval::<Array>(r#"files("/definitely/not/here")"#).is_err());
    }

    #[test]
    fn test_read_and_write_files_in_script() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("data")).unwrap();
        fs::write(tmp.path().join("data/links.txt"), "one\ntwo").unwrap();

        engine(tmp.path())
            .run(r#"let links = read_file("data/links.txt").split("\n"); write_file("feeds/links.xml", "<n>" + links.len() + "</n>");"#)
            .unwrap();

        assert_eq!(
            fs::read_to_string(tmp.path().join("dist/feeds/links.xml")).unwrap(),
            "<n>2</n>"
        );
    }

    #[test]
    fn test_file_access_stays_inside_roots() {
        let tmp = TempDir::new().unwrap();
        let engine = engine(&tmp.path().join("site"));

        assert!(engine.run(r#"write_file("../escaped.txt", "x")"#).is_err());
        assert!(engine.run(r#"write_file("/tmp/escaped.txt", "x")"#).is_err());
        assert!(engine.eval::<String>(r#"read_file("../../etc/passwd")"#).is_err());
        assert!(!tmp.path().join("site/escaped.txt").exists());
        assert!(!tmp.path().join("escaped.txt").exists());
    }

    #[test]
    fn test_get_env_falls_back_to_env_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(".env"),
            "ALVU_TEST_ONLY_IN_FILE=from-file\nPATH=shadowed\n",
        )
        .unwrap();
        let engine = engine(tmp.path());

        let from_file: String = engine.eval(r#"get_env(".env", "ALVU_TEST_ONLY_IN_FILE")"#).unwrap();
        assert_eq!(from_file, "from-file");

        let from_process: String = engine.eval(r#"get_env(".env", "PATH")"#).unwrap();
        assert_ne!(from_process, "shadowed");

        let missing_file: String = engine.eval(r#"get_env("nope.env", "ALVU_TEST_ONLY_IN_FILE")"#).unwrap();
        assert_eq!(missing_file, "");
    }

    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !String::from_utf8_lossy(&request).contains("\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{}/feed", addr)
    }

    #[test]
    fn test_http_get_in_script() {
        let url = serve_once("200 OK", "hello");
        let engine = engine(Path::new("."));
        let out: String = engine
            .eval(&format!(r#"let r = http_get("{}"); "" + r.status + ":" + r.body"#, url))
            .unwrap();
        assert_eq!(out, "200:hello");
    }

    #[test]
    fn test_http_error_status_is_returned() {
        let url = serve_once("404 Not Found", "missing");
        let engine = engine(Path::new("."));
        let status: i64 = engine.eval(&format!(r#"http_get("{}").status"#, url)).unwrap();
        assert_eq!(status, 404);
    }
}
