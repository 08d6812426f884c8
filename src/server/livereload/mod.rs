pub mod handler;
pub mod hub;

pub use handler::livereload_handler;
pub use hub::LiveReloadHub;

/// Path of the WebSocket endpoint the client script connects to
pub const LIVERELOAD_PATH: &str = "/ws";

/// Client appended to every page rendered while serving
pub const LIVERELOAD_SCRIPT: &str = r#"<script>
(function () {
  var socket = new WebSocket("ws://" + location.host + "/ws");
  socket.onmessage = function (event) {
    if (event.data === "reload") {
      window.location.reload();
    }
  };
  socket.onclose = function () {
    console.log("[alvu] live reload disconnected");
  };
})();
</script>"#;

/// Insert the live reload client before the last `</body>`, or append it
/// when the page has none
pub fn inject_livereload_script(html: &str) -> String {
    match html.rfind("</body>") {
        Some(index) => {
            let mut out = String::with_capacity(html.len() + LIVERELOAD_SCRIPT.len());
            out.push_str(&html[..index]);
            out.push_str(LIVERELOAD_SCRIPT);
            out.push_str(&html[index..]);
            out
        }
        None => format!("{}{}", html, LIVERELOAD_SCRIPT),
    }
}
