use std::io::Write;

fn tarball(files: &[(&str, &str)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_path(path).unwrap();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append(&header, content.as_bytes()).unwrap();
    }
    builder.into_inner().unwrap()
}

fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = libflate::gzip::Encoder::new(Vec::new()).unwrap();
    encoder.write_all(bytes).unwrap();
    encoder.finish().into_result().unwrap()
}

/// Builds a minimal `.deb` with a control paragraph and, optionally, a
/// copyright file at `usr/share/doc/<name>/copyright`
pub fn deb_bytes(name: &str, version: &str, homepage: &str, copyright: Option<&str>) -> Vec<u8> {
    let control = format!(
        "Package: {}\nVersion: {}\nArchitecture: amd64\nHomepage: {}\nDescription: test package\n",
        name, version, homepage
    );
    let copyright_path = format!("./usr/share/doc/{}/copyright", name);
    let data_files: Vec<(&str, &str)> = match copyright {
        Some(text) => vec![(copyright_path.as_str(), text)],
        None => Vec::new(),
    };

    let mut archive = Vec::new();
    let mut builder = ar::Builder::new(&mut archive);
    for (member, data) in [
        ("debian-binary", b"2.0\n".to_vec()),
        ("control.tar.gz", gzip(&tarball(&[("./control", &control)]))),
        ("data.tar.gz", gzip(&tarball(&data_files))),
    ] {
        let header = ar::Header::new(member.as_bytes().to_vec(), data.len() as u64);
        builder.append(&header, data.as_slice()).unwrap();
    }
    drop(builder);
    archive
}

/// A vulnerability scan result document with the given `(id, severity)` findings
pub fn trivy_result(target: &str, findings: &[(&str, &str)]) -> String {
    let vulnerabilities: Vec<serde_json::Value> = findings
        .iter()
        .map(|(id, severity)| {
            serde_json::json!({
                "VulnerabilityID": id,
                "PkgName": target,
                "InstalledVersion": "1.0",
                "FixedVersion": "1.1",
                "Severity": severity,
                "Title": format!("{} in {}", id, target),
            })
        })
        .collect();
    serde_json::json!({
        "SchemaVersion": 2,
        "Results": [{ "Target": target, "Vulnerabilities": vulnerabilities }]
    })
    .to_string()
}
