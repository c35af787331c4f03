use criterion::{criterion_main, criterion_group, Criterion};

use std::fmt::Write;
use miniucd_ucd::{flatten, PropertyCatalog, UcdSource};

/// Repertoire with `groups` groups of 64 characters, alternating case mappings
fn build_xml(groups: u32) -> String {
    let mut xml = String::from("<ucd><description>Unicode 16.0.0</description><repertoire>");
    for group in 0..groups {
        let gc = if group % 2 == 0 { "Lu" } else { "Ll" };
        _ = write!(xml, r#"<group gc="{gc}" sc="Latn" scx="Latn Grek" bc="L" Alpha="Y">"#);
        for idx in 0..64 {
            let cp = group * 64 + idx;
            _ = write!(xml, r#"<char cp="{cp:04X}" suc="{:04X}" uc="{:04X} {:04X}"/>"#, cp + 32, cp, cp);
        }
        xml.push_str("</group>");
    }
    xml.push_str("</repertoire></ucd>");
    xml
}

fn flatten_benchmark(c: &mut Criterion) {
    let catalog = PropertyCatalog::default();
    let xml = build_xml(256);
    let source = UcdSource::parse(&xml).unwrap();

    c.bench_function("parse xml: 16384 chars", |b| b.iter(|| {
        UcdSource::parse(&xml).unwrap()
    }));

    c.bench_function("flatten: 16384 chars", |b| b.iter(|| {
        flatten(&catalog, &source, "16.0.0").unwrap()
    }));
}

criterion_group!(benches, flatten_benchmark);
criterion_main!(benches);
