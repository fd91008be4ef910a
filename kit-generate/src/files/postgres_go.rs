use std::path::PathBuf;

use kitgen_codegen::{
    GoFile,
    ast::{Code, Const, Func, GoType, Param, Stmt, Var},
};
use kitgen_core::{FileRules, GENERATED_HEADER, GeneratedFile};

use super::err_result;

/// Connection settings and the `GetDatabase` accessor.
pub struct PostgresConfigGo {
    pub path: PathBuf,
    pub package: String,
    pub module: String,
    pub config_import: String,
}

impl PostgresConfigGo {
    pub fn new(
        path: impl Into<PathBuf>,
        package: impl Into<String>,
        module: impl Into<String>,
        config_import: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            package: package.into(),
            module: module.into(),
            config_import: config_import.into(),
        }
    }

    fn get_db_info(&self) -> Func {
        let fields = [
            ("Host", "DBHost"),
            ("Port", "DBPort"),
            ("Name", "DBName"),
            ("User", "DBUser"),
            ("Pass", "DBPass"),
            ("SearchPath", "DBSchema"),
        ];

        Func::new("GetDBInfo")
            .result(Param::new("dbInfo", GoType::ident("DBInfo")))
            .result(err_result())
            .line(
                Code::new()
                    .text("conf := ")
                    .qual(&self.config_import, "AppConfig")
                    .text("{}"),
            )
            .line(
                Code::new()
                    .text("_ = ")
                    .qual("github.com/caarlos0/env/v6", "Parse")
                    .text("(&conf)"),
            )
            .line(composite_literal("dbInfo = DBInfo", &fields))
            .line("return")
    }

    fn get_database() -> Func {
        Func::new("GetDatabase")
            .param(Param::new("aliasName", GoType::string()))
            .result(Param::new(
                "db",
                GoType::qual("github.com/jinzhu/gorm", "DB").pointer(),
            ))
            .result(err_result())
            .line("var customerSchema string")
            .line(
                Code::new()
                    .text("_, errConv := ")
                    .qual("strconv", "Atoi")
                    .text("(aliasName)"),
            )
            .stmt(
                Stmt::block(
                    "if errConv == nil",
                    vec![Stmt::line("customerSchema = aliasName")],
                )
                .or_else(vec![Stmt::line("customerSchema = DefaultConnName")]),
            )
            .line("db, err = GetDB(customerSchema)")
            .stmt(Stmt::block(
                "if err != nil",
                vec![
                    Stmt::line("var dbInfo DBInfo"),
                    Stmt::line("dbInfo, err = GetDBInfo()"),
                    Stmt::block(
                        "if err == nil",
                        vec![
                            Stmt::line(
                                Code::new()
                                    .text("err = RegisterDataBase(customerSchema, ")
                                    .lit("postgres")
                                    .text(", CreateDBConnectionString(dbInfo))"),
                            ),
                            Stmt::block(
                                "if err == nil",
                                vec![Stmt::line("db, err = GetDB(customerSchema)")],
                            ),
                        ],
                    ),
                ],
            ))
            .line("return")
    }
}

impl GeneratedFile for PostgresConfigGo {
    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn rules(&self) -> FileRules {
        FileRules::if_missing()
    }

    fn render(&self) -> String {
        GoFile::new(&self.package)
            .local_module(&self.module)
            .add(Var::new("Mutex").ty(GoType::qual("sync", "RWMutex").pointer()))
            .add(Const::new("DefaultConnName", Code::new().lit("default")))
            .add(self.get_db_info())
            .add(Self::get_database())
            .render()
    }
}

/// `head{` with one aligned `key: conf.value,` line per field, then `}`.
fn composite_literal(head: &str, fields: &[(&str, &str)]) -> String {
    let width = fields.iter().map(|(key, _)| key.len() + 1).max().unwrap_or(0);
    let mut out = format!("{}{{\n", head);
    for (key, setting) in fields {
        out.push_str(&format!(
            "\t{:<width$} conf.{},\n",
            format!("{}:", key),
            setting,
            width = width
        ));
    }
    out.push('}');
    out
}

/// Named connection registry backed by gorm.
pub struct DbGo {
    pub path: PathBuf,
    pub package: String,
}

impl DbGo {
    pub fn new(path: impl Into<PathBuf>, package: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            package: package.into(),
        }
    }
}

impl GeneratedFile for DbGo {
    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn rules(&self) -> FileRules {
        FileRules::always_overwrite().with_header(GENERATED_HEADER)
    }

    fn render(&self) -> String {
        let package = GoFile::new(&self.package).render();
        format!(
            "{}{}",
            package,
            r#"
import (
	"fmt"
	"sync"

	"github.com/jinzhu/gorm"
	_ "github.com/jinzhu/gorm/dialects/postgres"
)

type DBInfo struct {
	Host       string
	Port       string
	Name       string
	User       string
	Pass       string
	SearchPath string
}

var dataBaseCache = &dbCache{cache: make(map[string]*alias)}

type DB struct {
	*sync.RWMutex
	DB *gorm.DB
}

type alias struct {
	Name         string
	MaxIdleConns int
	MaxOpenConns int
	DB           *DB
}

type dbCache struct {
	mux   sync.RWMutex
	cache map[string]*alias
}

func (ac *dbCache) add(name string, al *alias) (added bool) {
	ac.mux.Lock()
	defer ac.mux.Unlock()
	if _, ok := ac.cache[name]; !ok {
		ac.cache[name] = al
		added = true
	}
	return
}

func (ac *dbCache) get(name string) (al *alias, ok bool) {
	ac.mux.RLock()
	defer ac.mux.RUnlock()
	al, ok = ac.cache[name]
	return
}

// GetDB returns the connection registered under the alias, "default" if none is given.
func GetDB(aliasNames ...string) (*gorm.DB, error) {
	name := "default"
	if len(aliasNames) > 0 {
		name = aliasNames[0]
	}
	if al, ok := dataBaseCache.get(name); ok {
		return al.DB.DB.Debug(), nil
	}
	return &gorm.DB{}, fmt.Errorf("DataBase of alias name %s not found", name)
}

// RegisterDataBase opens a connection and registers it under aliasName.
// Optional params are max idle and max open connections.
func RegisterDataBase(aliasName, driverName, dataSource string, params ...int) error {
	db, err := gorm.Open(driverName, dataSource)
	if err != nil {
		return fmt.Errorf("register db %s, %s", aliasName, err.Error())
	}

	al, err := addAliasWithDB(aliasName, db)
	if err != nil {
		_ = db.Close()
		return err
	}

	for i, v := range params {
		switch i {
		case 0:
			SetMaxIdleConns(al.Name, v)
		case 1:
			SetMaxOpenConns(al.Name, v)
		}
	}
	return nil
}

func addAliasWithDB(aliasName string, db *gorm.DB) (*alias, error) {
	al := &alias{
		Name: aliasName,
		DB:   &DB{RWMutex: new(sync.RWMutex), DB: db},
	}

	if err := db.DB().Ping(); err != nil {
		return nil, fmt.Errorf("register db Ping %s, %s", aliasName, err.Error())
	}

	if !dataBaseCache.add(aliasName, al) {
		return nil, fmt.Errorf("DataBase alias name %s already registered, cannot reuse", aliasName)
	}
	return al, nil
}

func getDbAlias(name string) *alias {
	if al, ok := dataBaseCache.get(name); ok {
		return al
	}
	panic(fmt.Errorf("unknown DataBase alias name %s", name))
}

// SetMaxIdleConns changes the max idle conns of the named connection.
func SetMaxIdleConns(aliasName string, maxIdleConns int) {
	al := getDbAlias(aliasName)
	al.MaxIdleConns = maxIdleConns
	al.DB.DB.DB().SetMaxIdleConns(maxIdleConns)
}

// SetMaxOpenConns changes the max open conns of the named connection.
func SetMaxOpenConns(aliasName string, maxOpenConns int) {
	al := getDbAlias(aliasName)
	al.MaxOpenConns = maxOpenConns
	al.DB.DB.DB().SetMaxOpenConns(maxOpenConns)
}

func CreateDBConnectionString(info DBInfo) string {
	return fmt.Sprintf(
		"host=%s port=%s user=%s dbname=%s sslmode=disable password=%s search_path=%s",
		info.Host, info.Port, info.User, info.Name, info.Pass, info.SearchPath,
	)
}
"#
        )
    }
}
