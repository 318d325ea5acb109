use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hexweave::{
    spell::{self, builtins, Literal},
    CastConfig, CastVm, Entity, EntityType, Iota, StaticEnvironment,
};
use std::rc::Rc;

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("casting");
    group.sample_size(50);

    let kind = Rc::new(EntityType::new("Player"));
    let env =
        StaticEnvironment::new(Rc::new(Entity::new(kind, "Astavie")));

    let data: Vec<Literal> =
        (0..100).map(|n| Literal::Num(n as f64)).collect();
    let program = spell::compile(&[
        Literal::Num(0.0),
        Literal::List(vec![Literal::Pattern(builtins::hermes_gambit())]),
        Literal::List(data),
        Literal::Pattern(builtins::thoths_gambit()),
    ])
    .unwrap();

    group.bench_function("thoth fold", |b| {
        b.iter(|| {
            let mut vm = CastVm::new(CastConfig::default()).unwrap();
            vm.run(
                &env,
                black_box(program.clone())
                    .into_iter()
                    .map(Iota::Pattern),
            )
            .unwrap()
        })
    });
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
