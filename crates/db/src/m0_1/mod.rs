mod recipe;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "pantry",
    "m0_1",
    vec_box![],
    vec_box![recipe::CreateTable, recipe::CreateSourceDomainIdx]
);
