use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use roster::{find_employees, from_xml_str, to_xml_string, MatchCriteria};

fn staff_xml(count: usize) -> String {
    let mut xml = String::from("<employees>");
    for i in 0..count {
        xml.push_str(&format!(
            "<employee><name>Employee {i}</name><age>{}</age><designation>Engineer</designation>\
             <address><doorNo>{i}</doorNo><street>MG Road</street></address></employee>",
            20 + i % 40
        ));
    }
    xml.push_str("</employees>");
    xml
}

fn bench_parse(c: &mut Criterion) {
    let xml = staff_xml(1_000);
    c.bench_function("roster_parse_1000", |b| {
        b.iter(|| from_xml_str(black_box(&xml)))
    });
}

fn bench_find(c: &mut Criterion) {
    let Ok(doc) = from_xml_str(&staff_xml(1_000)) else {
        return;
    };
    let criteria = MatchCriteria::new().with("age", "42").with("name", "EMPLOYEE 7");
    c.bench_function("roster_find_1000", |b| {
        b.iter(|| find_employees(black_box(&doc), black_box(&criteria)).len())
    });
}

fn bench_serialize(c: &mut Criterion) {
    let Ok(doc) = from_xml_str(&staff_xml(1_000)) else {
        return;
    };
    c.bench_function("roster_serialize_1000", |b| {
        b.iter(|| to_xml_string(black_box(&doc)))
    });
}

criterion_group!(benches, bench_parse, bench_find, bench_serialize);
criterion_main!(benches);
