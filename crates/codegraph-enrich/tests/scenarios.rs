use std::fs;

use codegraph_adapter::{Enricher, LanguageAdapter};
use codegraph_enrich::{FiberEnricher, GinEnricher, LaravelEnricher, SpringEnricher};
use codegraph_lang_go::GoAdapter;
use codegraph_lang_java::JavaAdapter;
use codegraph_lang_php::PhpAdapter;

fn write_source(dir: &std::path::Path, relative: &str, contents: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[test]
fn spring_controller_gains_routes_and_stereotypes() {
    let dir = tempfile::tempdir().unwrap();
    write_source(
        dir.path(),
        "UsersCtrl.java",
        "package api;\n\n\
         @RestController\n\
         @RequestMapping(\"/api\")\n\
         class UsersCtrl {\n\
         \t@GetMapping(\"/{id}\")\n\
         \tUser find(long id) { return null; }\n\
         }\n",
    );

    let adapter = JavaAdapter::new("proj");
    let mut ir = adapter.analyze(dir.path()).unwrap();

    SpringEnricher::new().enrich(&mut ir, dir.path()).unwrap();

    let ctrl = ir.types.iter().find(|t| t.qualified_name == "api.UsersCtrl").expect("UsersCtrl type");
    assert!(ctrl.stereotypes.contains(&"spring:controller".to_string()));

    let find = ir.callables.iter().find(|c| c.qualified_name == "api.UsersCtrl.find").expect("find callable");
    assert_eq!(find.routes, vec!["GET /api/{id}".to_string()]);
    assert!(find.stereotypes.contains(&"spring:route".to_string()));
}

#[test]
fn spring_autowired_field_records_injects_relationship() {
    let dir = tempfile::tempdir().unwrap();
    write_source(
        dir.path(),
        "UserService.java",
        "package api;\n\n@Service\nclass UserService {}\n",
    );
    write_source(
        dir.path(),
        "UsersCtrl.java",
        "package api;\n\n\
         @RestController\n\
         class UsersCtrl {\n\
         \t@Autowired\n\
         \tprivate UserService service;\n\
         }\n",
    );

    let adapter = JavaAdapter::new("proj");
    let mut ir = adapter.analyze(dir.path()).unwrap();
    SpringEnricher::new().enrich(&mut ir, dir.path()).unwrap();

    let ctrl = ir.types.iter().find(|t| t.qualified_name == "api.UsersCtrl").expect("UsersCtrl");
    let service = ir.types.iter().find(|t| t.qualified_name == "api.UserService").expect("UserService");

    assert!(ir
        .relationships
        .iter()
        .any(|r| r.source == ctrl.id && r.target == service.id && r.kind == "INJECTS"));
}

#[test]
fn spring_jpa_repository_records_persists_relationship() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path(), "User.java", "package api;\n\n@Entity\nclass User {}\n");
    write_source(
        dir.path(),
        "UserRepository.java",
        "package api;\n\ninterface UserRepository extends JpaRepository<User, Long> {}\n",
    );

    let adapter = JavaAdapter::new("proj");
    let mut ir = adapter.analyze(dir.path()).unwrap();
    SpringEnricher::new().enrich(&mut ir, dir.path()).unwrap();

    let user = ir.types.iter().find(|t| t.qualified_name == "api.User").expect("User");
    let repo = ir.types.iter().find(|t| t.qualified_name == "api.UserRepository").expect("UserRepository");

    assert!(user.stereotypes.contains(&"jpa:entity".to_string()));
    assert!(ir
        .relationships
        .iter()
        .any(|r| r.source == repo.id && r.target == user.id && r.kind == "PERSISTS"));
}

#[test]
fn spring_enrich_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    write_source(
        dir.path(),
        "UsersCtrl.java",
        "package api;\n\n\
         @RestController\n\
         @RequestMapping(\"/api\")\n\
         class UsersCtrl {\n\
         \t@GetMapping(\"/{id}\")\n\
         \tUser find(long id) { return null; }\n\
         \t@Autowired\n\
         \tprivate UsersCtrl self;\n\
         }\n",
    );

    let adapter = JavaAdapter::new("proj");
    let mut ir = adapter.analyze(dir.path()).unwrap();
    let enricher = SpringEnricher::new();

    enricher.enrich(&mut ir, dir.path()).unwrap();
    let after_first = ir.clone();
    enricher.enrich(&mut ir, dir.path()).unwrap();

    assert_eq!(after_first, ir);
}

#[test]
fn gin_group_prefix_resolves_through_handler_reference() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path(), "go.mod", "module example.com/app\n\ngo 1.21\n");
    write_source(
        dir.path(),
        "main.go",
        "package main\n\n\
         import \"github.com/gin-gonic/gin\"\n\n\
         func listUsers(c *gin.Context) {}\n\n\
         func setup() {\n\
         \tr := gin.Default()\n\
         \tapi := r.Group(\"/api\")\n\
         \tapi.GET(\"/users\", listUsers)\n\
         }\n",
    );

    let adapter = GoAdapter::new("proj");
    let mut ir = adapter.analyze(dir.path()).unwrap();
    GinEnricher::new().enrich(&mut ir, dir.path()).unwrap();

    let handler = ir
        .callables
        .iter()
        .find(|c| c.qualified_name == "example.com/app.listUsers")
        .expect("listUsers callable");
    assert_eq!(handler.routes, vec!["GET /api/users".to_string()]);
    assert!(handler.stereotypes.contains(&"gin:route".to_string()));
}

#[test]
fn fiber_verb_path_method_records_route() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path(), "go.mod", "module example.com/app\n\ngo 1.21\n");
    write_source(
        dir.path(),
        "main.go",
        "package main\n\n\
         import \"github.com/gofiber/fiber/v2\"\n\n\
         func ping(c *fiber.Ctx) error { return nil }\n\n\
         func setup() {\n\
         \tapp := fiber.New()\n\
         \tapp.Add(\"GET\", \"/ping\", ping)\n\
         }\n",
    );

    let adapter = GoAdapter::new("proj");
    let mut ir = adapter.analyze(dir.path()).unwrap();
    FiberEnricher::new().enrich(&mut ir, dir.path()).unwrap();

    let handler = ir
        .callables
        .iter()
        .find(|c| c.qualified_name == "example.com/app.ping")
        .expect("ping callable");
    assert_eq!(handler.routes, vec!["GET /ping".to_string()]);
    assert!(handler.stereotypes.contains(&"fiber:route".to_string()));
}

#[test]
fn laravel_api_resource_expands_to_conventional_routes() {
    let dir = tempfile::tempdir().unwrap();
    write_source(
        dir.path(),
        "app/Http/Controllers/UserController.php",
        "<?php\n\
         namespace App\\Http\\Controllers;\n\n\
         class UserController\n\
         {\n\
         \tpublic function index() {}\n\
         \tpublic function store() {}\n\
         \tpublic function show($id) {}\n\
         \tpublic function update($id) {}\n\
         \tpublic function destroy($id) {}\n\
         }\n",
    );
    write_source(
        dir.path(),
        "routes/api.php",
        "<?php\n\
         use App\\Http\\Controllers\\UserController;\n\n\
         Route::apiResource('users', UserController::class);\n",
    );

    let adapter = PhpAdapter::new("proj");
    let mut ir = adapter.analyze(dir.path()).unwrap();
    LaravelEnricher::new().enrich(&mut ir, dir.path()).unwrap();

    let index = ir
        .callables
        .iter()
        .find(|c| c.qualified_name == "App.Http.Controllers.UserController.index")
        .expect("index callable");
    assert_eq!(index.routes, vec!["GET /users".to_string()]);
    assert!(index.stereotypes.contains(&"laravel:route".to_string()));

    let update = ir
        .callables
        .iter()
        .find(|c| c.qualified_name == "App.Http.Controllers.UserController.update")
        .expect("update callable");
    assert_eq!(update.routes, vec!["PUT /users/{id}".to_string(), "PATCH /users/{id}".to_string()]);

    let destroy = ir
        .callables
        .iter()
        .find(|c| c.qualified_name == "App.Http.Controllers.UserController.destroy")
        .expect("destroy callable");
    assert_eq!(destroy.routes, vec!["DELETE /users/{id}".to_string()]);
}

#[test]
fn laravel_without_routes_directory_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    write_source(
        dir.path(),
        "app/Http/Controllers/UserController.php",
        "<?php\nnamespace App\\Http\\Controllers;\n\nclass UserController\n{\n\tpublic function index() {}\n}\n",
    );

    let adapter = PhpAdapter::new("proj");
    let mut ir = adapter.analyze(dir.path()).unwrap();
    let before = ir.clone();
    LaravelEnricher::new().enrich(&mut ir, dir.path()).unwrap();
    assert_eq!(before, ir);
}

#[test]
fn laravel_enrich_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    write_source(
        dir.path(),
        "app/Http/Controllers/UserController.php",
        "<?php\nnamespace App\\Http\\Controllers;\n\nclass UserController\n{\n\tpublic function index() {}\n}\n",
    );
    write_source(
        dir.path(),
        "routes/web.php",
        "<?php\nuse App\\Http\\Controllers\\UserController;\n\nRoute::get('/users', [UserController::class, 'index']);\n",
    );

    let adapter = PhpAdapter::new("proj");
    let mut ir = adapter.analyze(dir.path()).unwrap();
    let enricher = LaravelEnricher::new();

    enricher.enrich(&mut ir, dir.path()).unwrap();
    let after_first = ir.clone();
    enricher.enrich(&mut ir, dir.path()).unwrap();

    assert_eq!(after_first, ir);
}
