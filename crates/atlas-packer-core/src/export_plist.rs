use crate::model::PackingResult;
use crate::pipeline::tight_bounds;

/// Build a Cocos2d-style Apple plist (XML, format 2) with frames in a dict keyed by name.
///
/// Sizes in `frame`, `sourceColorRect` and `sourceSize` are the placed footprint;
/// `offset` is always `{0,0}` because sprites are never trimmed.
pub fn to_plist<K: ToString>(result: &PackingResult<K>, texture_file_name: &str) -> String {
    let mut s = String::new();
    s.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
  <key>frames</key>
  <dict>
"#);
    for p in &result.placements {
        let name = p.key.to_string();
        let (x, y, w, h) = (p.frame.x, p.frame.y, p.frame.w, p.frame.h);
        s.push_str(&format!(
            "    <key>{}</key>\n    <dict>\n      <key>frame</key>\n      <string>{{{{{},{}}},{{{},{}}}}}</string>\n      <key>offset</key>\n      <string>{{0,0}}</string>\n      <key>rotated</key>\n      <{}/>\n      <key>sourceColorRect</key>\n      <string>{{{{0,0}},{{{},{}}}}}</string>\n      <key>sourceSize</key>\n      <string>{{{},{}}}</string>\n    </dict>\n",
            xml_escape(&name),
            x, y, w, h,
            if p.rotated { "true" } else { "false" },
            w, h,
            w, h,
        ));
    }
    s.push_str("  </dict>\n");

    let (max_right, max_bottom) = tight_bounds(&result.placements);
    s.push_str(&format!(
        "  <key>metadata</key>\n  <dict>\n    <key>format</key>\n    <integer>2</integer>\n    <key>textureFileName</key>\n    <string>{}</string>\n    <key>size</key>\n    <string>{{{},{}}}</string>\n  </dict>\n",
        xml_escape(texture_file_name),
        max_right,
        max_bottom,
    ));
    s.push_str("</dict>\n</plist>\n");
    s
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
