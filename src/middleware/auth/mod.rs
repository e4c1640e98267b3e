/*
 * Responsibility
 * - route handler の手前で動く guard 群
 *   - restricted: bearer token の検証 → AuthCtx を extensions に入れる
 *   - only: AuthCtx の role_name が指定ロールと一致するか
 *   - username: body の username がユーザーストアに存在するか
 *   - role_name: body の role_name を正規化 → RoleName を extensions に入れる
 * - 各 guard は `Ok(next.run(req))` で続行、`Err(AppError)` で打ち切り
 */
mod body;
pub mod only;
pub mod restricted;
pub mod role_name;
pub mod username;
