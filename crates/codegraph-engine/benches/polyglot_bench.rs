//! Measures end-to-end `analyze_project` time (scan + resolve + merge +
//! enrich) across a polyglot tree of increasing size, to see whether the
//! per-language passes or the merge/enrich tail dominates as a repository
//! grows.

use std::fs;
use std::path::Path;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

fn generate_java_controller(index: usize) -> String {
    format!(
        "package api;\n\n\
         @RestController\n\
         @RequestMapping(\"/items{index}\")\n\
         class ItemController{index} {{\n\
         \t@Autowired\n\
         \tprivate ItemService{index} service;\n\n\
         \t@GetMapping(\"/{{id}}\")\n\
         \tItem{index} find(long id) {{ return service.lookup(id); }}\n\n\
         \t@PostMapping\n\
         \tItem{index} create(Item{index} payload) {{ return service.save(payload); }}\n\
         }}\n\n\
         @Service\n\
         class ItemService{index} {{\n\
         \tItem{index} lookup(long id) {{ return null; }}\n\
         \tItem{index} save(Item{index} payload) {{ return payload; }}\n\
         }}\n\n\
         class Item{index} {{}}\n"
    )
}

fn generate_go_handler(index: usize) -> String {
    format!(
        "package main\n\n\
         import \"github.com/gin-gonic/gin\"\n\n\
         func listItems{index}(c *gin.Context) {{}}\n\n\
         func setupRoutes{index}(r *gin.Engine) {{\n\
         \tgroup := r.Group(\"/items{index}\")\n\
         \tgroup.GET(\"/\", listItems{index})\n\
         }}\n"
    )
}

fn build_fixture(dir: &Path, entity_count: usize) {
    fs::write(dir.join("go.mod"), "module example.com/bench\n\ngo 1.21\n").unwrap();
    for i in 0..entity_count {
        fs::write(dir.join(format!("Item{i}Controller.java")), generate_java_controller(i)).unwrap();
        fs::write(dir.join(format!("handler_{i}.go")), generate_go_handler(i)).unwrap();
    }
}

fn bench_analyze_project(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_project");
    for entity_count in [5usize, 25, 100] {
        let dir = tempfile::tempdir().unwrap();
        build_fixture(dir.path(), entity_count);

        group.bench_with_input(BenchmarkId::from_parameter(entity_count), &entity_count, |b, _| {
            b.iter(|| codegraph_engine::analyze_project("bench", dir.path()).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_analyze_project);
criterion_main!(benches);
