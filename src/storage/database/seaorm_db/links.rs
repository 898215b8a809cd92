//! Join-table helpers shared by the store implementations and the delete paths

use crate::utils::error::{RbacError, ReferenceKind, Result};
use sea_orm::*;
use std::collections::BTreeSet;

/// Distinct raw ids in ascending order
pub(super) fn distinct<T: Copy + Into<i32>>(ids: &[T]) -> Vec<i32> {
    ids.iter()
        .map(|id| (*id).into())
        .collect::<BTreeSet<i32>>()
        .into_iter()
        .collect()
}

/// Fail with `InvalidReference` unless every id is a row of `E`
pub(super) async fn ensure_exist<E, C>(
    conn: &C,
    id_column: E::Column,
    ids: &[i32],
    kind: ReferenceKind,
) -> Result<()>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(());
    }

    let found: BTreeSet<i32> = E::find()
        .select_only()
        .column(id_column)
        .filter(id_column.is_in(ids.iter().copied()))
        .into_tuple::<i32>()
        .all(conn)
        .await
        .map_err(RbacError::Database)?
        .into_iter()
        .collect();

    let missing: Vec<i32> = ids.iter().copied().filter(|id| !found.contains(id)).collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(RbacError::invalid_reference(kind, missing))
    }
}

/// Values of `select` on every row of `E` whose `key` is one of `keys`
pub(super) async fn linked<E, C>(
    conn: &C,
    key: E::Column,
    keys: Vec<i32>,
    select: E::Column,
) -> Result<BTreeSet<i32>>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    if keys.is_empty() {
        return Ok(BTreeSet::new());
    }

    let values = E::find()
        .select_only()
        .column(select)
        .filter(key.is_in(keys))
        .into_tuple::<i32>()
        .all(conn)
        .await
        .map_err(RbacError::Database)?;

    Ok(values.into_iter().collect())
}

/// Delete every row of `E` whose `key` equals `owner`
pub(super) async fn unlink_all<E, C>(conn: &C, key: E::Column, owner: i32) -> Result<u64>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let result = E::delete_many()
        .filter(key.eq(owner))
        .exec(conn)
        .await
        .map_err(RbacError::Database)?;
    Ok(result.rows_affected)
}

/// Replace the rows of `E` owned by `owner` with `rows`
pub(super) async fn replace<E, A, C>(
    conn: &C,
    key: E::Column,
    owner: i32,
    rows: Vec<A>,
) -> Result<()>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<A>,
    A: ActiveModelTrait<Entity = E>,
    C: ConnectionTrait,
{
    unlink_all::<E, C>(conn, key, owner).await?;
    if rows.is_empty() {
        return Ok(());
    }
    E::insert_many(rows)
        .exec_without_returning(conn)
        .await
        .map_err(RbacError::Database)?;
    Ok(())
}

/// Atomically replace the links of one owner row
///
/// Checks that the owner and every target exist, then deletes the owner's
/// rows in `J` and inserts one row per target, all inside one transaction.
#[allow(clippy::too_many_arguments)]
pub(super) async fn rebind<O, T, J, A, F>(
    db: &DatabaseConnection,
    owner_column: O::Column,
    owner_kind: ReferenceKind,
    owner: i32,
    target_column: T::Column,
    target_kind: ReferenceKind,
    targets: Vec<i32>,
    link_key: J::Column,
    build: F,
) -> Result<()>
where
    O: EntityTrait,
    T: EntityTrait,
    J: EntityTrait,
    J::Model: IntoActiveModel<A>,
    A: ActiveModelTrait<Entity = J>,
    F: Fn(i32) -> A,
{
    let txn = db.begin().await.map_err(RbacError::Database)?;

    ensure_exist::<O, _>(&txn, owner_column, &[owner], owner_kind).await?;
    ensure_exist::<T, _>(&txn, target_column, &targets, target_kind).await?;

    let rows: Vec<A> = targets.iter().map(|target| build(*target)).collect();
    replace::<J, A, _>(&txn, link_key, owner, rows).await?;

    txn.commit().await.map_err(RbacError::Database)?;
    Ok(())
}
