use std::path::PathBuf;

use kitgen_codegen::{
    GoFile,
    ast::{Code, Field, Func, GoType, Interface, Param, Signature, Stmt, Struct},
};
use kitgen_core::{FileRules, GeneratedFile};

use super::{ctx_param, err_result};

const UUID: &str = "github.com/google/uuid";
const GORM: &str = "github.com/jinzhu/gorm";

/// `BaseModel` and the `AutoMigration` entry point.
pub struct BaseModelGo {
    pub path: PathBuf,
    pub package: String,
    pub module: String,
    /// Import path of the storage adapter package.
    pub postgres_import: String,
}

impl BaseModelGo {
    pub fn new(
        path: impl Into<PathBuf>,
        package: impl Into<String>,
        module: impl Into<String>,
        postgres_import: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            package: package.into(),
            module: module.into(),
            postgres_import: postgres_import.into(),
        }
    }

    fn base_model() -> Struct {
        let uuid = || GoType::qual(UUID, "UUID");
        let time = || GoType::qual("time", "Time");

        Struct::new("BaseModel")
            .doc("BaseModel holds the columns shared by every table.")
            .field(
                Field::new("ID", uuid())
                    .tag("json", "id")
                    .tag("gorm", "primary_key;type:uuid;default:uuid_generate_v4()"),
            )
            .field(Field::new("CreatorID", uuid()).tag("json", "creator_id"))
            .field(Field::new("UpdaterID", uuid()).tag("json", "updater_id"))
            .field(
                Field::new("CreatedAt", time())
                    .tag("gorm", "column:created_at;default:CURRENT_TIMESTAMP"),
            )
            .field(
                Field::new("UpdatedAt", time())
                    .tag("gorm", "column:updated_at;default:CURRENT_TIMESTAMP"),
            )
            .field(
                Field::new("DeletedAt", time().pointer())
                    .tag("json", "deleted_at")
                    .tag("sql", "index"),
            )
    }

    fn auto_migration(&self) -> Func {
        Func::new("AutoMigration")
            .doc("AutoMigration prepares the default database for the models.")
            .result(err_result())
            .line(
                Code::new()
                    .text("dbPublic, err := ")
                    .qual(&self.postgres_import, "GetDatabase")
                    .text("(")
                    .lit("default")
                    .text(")"),
            )
            .stmt(Stmt::block("if err != nil", vec![Stmt::line("return")]))
            .line(
                Code::new()
                    .text("_, err = dbPublic.DB().Exec(")
                    .lit("CREATE EXTENSION IF NOT EXISTS \"uuid-ossp\"")
                    .text(")"),
            )
            .stmt(Stmt::block(
                "if err != nil",
                vec![Stmt::line(
                    Code::new()
                        .text("return ")
                        .qual("fmt", "Errorf")
                        .text("(")
                        .lit("error while creating DB extension 'uuid-ossp': %s")
                        .text(", err)"),
                )],
            ))
            .line("t := dbPublic.AutoMigrate()")
            .line("return t.Error")
    }
}

impl GeneratedFile for BaseModelGo {
    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn rules(&self) -> FileRules {
        FileRules::if_missing()
    }

    fn render(&self) -> String {
        GoFile::new(&self.package)
            .local_module(&self.module)
            .add(Self::base_model())
            .add(self.auto_migration())
            .render()
    }
}

/// The `PostgresDatabase` repository interface and a stub implementation.
pub struct PostgresModelGo {
    pub path: PathBuf,
    pub package: String,
}

impl PostgresModelGo {
    pub fn new(path: impl Into<PathBuf>, package: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            package: package.into(),
        }
    }

    /// Repository methods as (name, params, results).
    fn methods() -> Vec<(&'static str, Vec<Param>, Vec<Param>)> {
        let id = |name: &str| Param::new(name, GoType::qual(UUID, "UUID"));
        let any = || GoType::ident("interface{}");
        let value_and_error = || vec![Param::unnamed(any()), Param::unnamed(GoType::error())];

        vec![
            (
                "Create",
                vec![ctx_param(), Param::new("req", any()), id("creatorID")],
                value_and_error(),
            ),
            (
                "Update",
                vec![
                    ctx_param(),
                    Param::new("req", any()),
                    id("objectID"),
                    id("updaterID"),
                ],
                value_and_error(),
            ),
            ("GetOneByID", vec![ctx_param(), id("id")], value_and_error()),
            ("GetAll", vec![ctx_param()], value_and_error()),
            (
                "Delete",
                vec![ctx_param(), id("id")],
                vec![Param::unnamed(GoType::error())],
            ),
        ]
    }
}

impl GeneratedFile for PostgresModelGo {
    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn rules(&self) -> FileRules {
        FileRules::if_missing()
    }

    fn render(&self) -> String {
        let gorm_db = || GoType::qual(GORM, "DB").pointer();

        let mut iface = Interface::new("PostgresDatabase")
            .doc("PostgresDatabase is the storage contract of the service.")
            .comment("Add your db methods here,")
            .comment("e.x: Create(s User) (rs User, err error)");
        let mut file = GoFile::new(&self.package)
            .add(
                Func::new("NewBasicPostgresDatabase")
                    .param(Param::new("db", gorm_db()))
                    .result(Param::unnamed(GoType::ident("PostgresDatabase")))
                    .line("return &basicPostgresDatabase{db: db}"),
            )
            .add(Struct::new("basicPostgresDatabase").field(Field::new("db", gorm_db())));

        for (name, params, results) in Self::methods() {
            let mut signature = Signature::new(name);
            let mut method = Func::new(name).receiver(Param::new(
                "b",
                GoType::ident("basicPostgresDatabase"),
            ));
            for param in params {
                signature = signature.param(param.clone());
                method = method.param(param);
            }
            for result in results {
                signature = signature.result(result.clone());
                method = method.result(result);
            }

            iface = iface.method(signature);
            file.push(method.line(Code::new().text("panic(").lit("implement me").text(")")));
        }

        file.add(iface).render()
    }
}
