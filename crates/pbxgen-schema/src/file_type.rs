use std::path::Path;

/// Xcode `lastKnownFileType` for a file, inferred from its extension.
pub fn last_known_file_type(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("swift") => "sourcecode.swift",
        Some("m") => "sourcecode.c.objc",
        Some("mm") => "sourcecode.cpp.objcpp",
        Some("c") => "sourcecode.c.c",
        Some("h") => "sourcecode.c.h",
        Some("metal") => "sourcecode.metal",
        Some("xcassets") => "folder.assetcatalog",
        Some("storyboard") => "file.storyboard",
        Some("xib") => "file.xib",
        Some("strings") => "text.plist.strings",
        Some("xcstrings") => "text.json.xcstrings",
        Some("plist") => "text.plist.xml",
        Some("entitlements") => "text.plist.entitlements",
        Some("json") => "text.json",
        Some("png") => "image.png",
        Some("jpg" | "jpeg") => "image.jpeg",
        Some("xcconfig") => "text.xcconfig",
        _ => "file",
    }
}

/// Xcode `explicitFileType` of an application bundle product.
pub const APPLICATION_PRODUCT_TYPE: &str = "wrapper.application";
