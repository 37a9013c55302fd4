use criterion::{black_box, criterion_group, criterion_main, Criterion};
use formc::codegen::{CodeGenOptions, Format};
use formc::element::{DefaultTabulator, ElementCache, ElementDescriptor};
use formc::form::{BasisFunction, Index, Sum};
use formc::traits::types::ReferenceCellType;
use formc::Compiler;

fn poisson(degree: usize) -> Sum {
    let e = ElementDescriptor::new("Lagrange", ReferenceCellType::Triangle, degree);
    Sum::from(
        BasisFunction::test(e.clone()).dx(Index::Free(0))
            * BasisFunction::trial(e).dx(Index::Free(0)),
    )
}

pub fn compile_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    group.sample_size(20);

    for degree in 1..5 {
        let sums = [poisson(degree)];
        group.bench_function(format!("Build Poisson form of degree {degree}"), |b| {
            b.iter(|| {
                let cache = ElementCache::new();
                let compiler = Compiler::new(&DefaultTabulator, &cache);
                black_box(compiler.build(&sums).unwrap())
            })
        });

        let cache = ElementCache::new();
        let forms = Compiler::new(&DefaultTabulator, &cache)
            .build(&sums)
            .unwrap();
        let options = CodeGenOptions::default();
        group.bench_function(
            format!("Generate C++ for Poisson form of degree {degree}"),
            |b| b.iter(|| black_box(Format::Cpp.generate(&forms, &options).unwrap())),
        );
    }
    group.finish();
}

criterion_group!(benches, compile_benchmark);
criterion_main!(benches);
