use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum Recipe {
    Table,
    Id,
    Title,
    Description,
    SourceDomain,
    Url,
    Ingredients,
    Instructions,
    Tags,
    StepCount,
    CreatedAt,
}
