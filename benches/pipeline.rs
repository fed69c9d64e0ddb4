//! This bench test runs a large generated card file through classification
//! and hint derivation, sequentially and in parallel.

#![allow(missing_docs)]

use std::fmt::Write;

use criterion::{Criterion, criterion_group, criterion_main};
use flashcards::{Config, Pipeline};

/// Generates a mix of cards touching every rule family
fn generate_cards(count: usize) -> String {
    let questions = [
        ("CASO: paciente com hemiparesia, qual artéria?", "acm", "Difícil"),
        ("Qual via de acesso pterional expõe a cisterna?", "acessos-cirurgicos", ""),
        ("V ou F: o forame de Monro liga os ventrículos", "forame-monro", ""),
        ("V.C.I. = ____", "abreviacoes", ""),
        ("Qual a função do cerebelo?", "", ""),
        ("Liste os nervos cranianos", "item-lista", ""),
        ("Quanto % do débito cardíaco vai ao encéfalo?", "revisao-rapida", ""),
    ];

    let mut content = String::from("question,answer,tags,mnemonic,category,hint\n");
    for i in 0..count {
        let (question, tags, category) = questions[i % questions.len()];
        let _ = writeln!(content, "\"{question} #{i}\",Resposta {i},{tags},,{category},");
    }
    content
}

fn run_pipeline(c: &mut Criterion) {
    let content = generate_cards(1000);

    let sequential = Pipeline::default();
    c.bench_function("pipeline sequential", |b| {
        b.iter(|| sequential.run(&content));
    });

    let mut config = Config::default();
    config.parallel = true;
    let parallel = Pipeline::new(&config);
    c.bench_function("pipeline parallel", |b| {
        b.iter(|| parallel.run(&content));
    });
}

criterion_group!(benches, run_pipeline);
criterion_main!(benches);
