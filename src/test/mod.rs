use crate::metadata::{
    member::FieldModifiers,
    typesystem::{PrimitiveKind, TypeBuilder, TypeRc, TypeRegistry, TypeSignature},
};

#[derive(Clone, Default)]
pub struct Pet {
    pub name: String,
    pub happy: bool,
}

// Helper function to register `zoo.Pet`: getName, isHappy and getHappy
pub fn define_pet(registry: &TypeRegistry) -> TypeRc {
    registry
        .define(
            TypeBuilder::<Pet>::class("zoo", "Pet")
                .getter("getName", PrimitiveKind::String, |p: &Pet| p.name.clone())
                .getter("getHappy", PrimitiveKind::Bool, |p: &Pet| p.happy)
                .getter("isHappy", PrimitiveKind::Bool, |p: &Pet| p.happy),
        )
        .unwrap()
}

#[derive(Clone, Default)]
pub struct Counter {
    pub count: i32,
}

// Helper function to register a type that only has a field and a default constructor
pub fn define_counter(registry: &TypeRegistry) -> TypeRc {
    registry
        .define(
            TypeBuilder::<Counter>::class("test", "Counter")
                .field("count", PrimitiveKind::I32, |c| &c.count, |c| &mut c.count)
                .default_constructor(Counter::default),
        )
        .unwrap()
}

#[derive(Clone, Default)]
pub struct User {
    pub user_name: String,
}

// Helper function to register `app.User` with a getter/setter pair
pub fn define_user(registry: &TypeRegistry) -> TypeRc {
    registry
        .define(
            TypeBuilder::<User>::class("app", "User")
                .getter("getUserName", PrimitiveKind::String, |u: &User| {
                    u.user_name.clone()
                })
                .setter("setUserName", PrimitiveKind::String, |u: &mut User, v: String| {
                    u.user_name = v
                })
                .default_constructor(User::default),
        )
        .unwrap()
}

#[derive(Clone, Default)]
pub struct EntityBase {
    pub id: i64,
    pub version: i64,
}

#[derive(Clone, Default)]
pub struct Account {
    pub entity: EntityBase,
    pub owner: String,
    pub balance: i64,
    pub outer: u32,
}

// Helper function to register the generic `orm.Entity<K>` and `orm.Account extends Entity<i64>`
pub fn define_account(registry: &TypeRegistry) -> TypeRc {
    let entity = registry
        .define(
            TypeBuilder::<EntityBase>::abstract_class("orm", "Entity")
                .generic_param("K", vec![])
                .getter("getId", TypeSignature::var("K"), |e: &EntityBase| e.id)
                .setter("setId", TypeSignature::var("K"), |e: &mut EntityBase, v: i64| {
                    e.id = v
                })
                .field("version", TypeSignature::var("K"), |e| &e.version, |e| &mut e.version),
        )
        .unwrap();

    registry
        .define(
            TypeBuilder::<Account>::class("orm", "Account")
                .embeds(
                    &entity,
                    vec![PrimitiveKind::I64.into()],
                    |a| &a.entity,
                    |a| &mut a.entity,
                )
                .getter("getOwner", PrimitiveKind::String, |a: &Account| a.owner.clone())
                .setter("setOwner", PrimitiveKind::String, |a: &mut Account, v: String| {
                    a.owner = v
                })
                .field("balance", PrimitiveKind::I64, |a| &a.balance, |a| &mut a.balance)
                .field_with(
                    "outer",
                    PrimitiveKind::U32,
                    FieldModifiers::SYNTHETIC,
                    |a| &a.outer,
                    |a| &mut a.outer,
                )
                .constant("MAX_BALANCE", PrimitiveKind::I64, 1_000_000_i64)
                .default_constructor(Account::default),
        )
        .unwrap()
}

#[derive(Clone, Default)]
pub struct Mixed {
    pub code: i32,
    pub label: String,
    pub amount: i64,
}

// Helper function to register `conf.Mixed` with an ambiguous getter (`code`), an ambiguous
// setter (`amount`) and an exact setter match that follows a setter conflict (`label`)
pub fn define_mixed(registry: &TypeRegistry) -> TypeRc {
    let base = registry
        .define(
            TypeBuilder::<Mixed>::abstract_class("conf", "MixedBase")
                .getter("getCode", PrimitiveKind::String, |m: &Mixed| m.code.to_string()),
        )
        .unwrap();

    registry
        .define(
            TypeBuilder::<Mixed>::class("conf", "Mixed")
                .extends(&base, vec![])
                .getter("getCode", PrimitiveKind::I32, |m: &Mixed| m.code)
                .getter("getLabel", PrimitiveKind::String, |m: &Mixed| m.label.clone())
                .setter("setLabel", PrimitiveKind::I64, |m: &mut Mixed, v: i64| {
                    m.label = v.to_string()
                })
                .setter("setLabel", PrimitiveKind::Bool, |m: &mut Mixed, v: bool| {
                    m.label = v.to_string()
                })
                .setter("setLabel", PrimitiveKind::String, |m: &mut Mixed, v: String| {
                    m.label = v
                })
                .setter("setAmount", PrimitiveKind::String, |m: &mut Mixed, v: String| {
                    m.amount = v.len() as i64
                })
                .setter("setAmount", PrimitiveKind::I64, |m: &mut Mixed, v: i64| {
                    m.amount = v
                }),
        )
        .unwrap()
}
