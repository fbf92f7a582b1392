use recipebox_store::{Category, HomeFeed, Page, RecipeDetail, RecipeFilter, RecipeSummary};
use salvo::flash::FlashDepotExt;
use salvo::prelude::*;
use serde::Serialize;

use super::form::{self, RecipeForm};
use super::{Notice, notices, require_user, state, store};
use crate::AppError;
use crate::identity::IdentityDepotExt;

#[derive(Serialize)]
struct HomePage {
    #[serde(flatten)]
    feed: HomeFeed,
    flash: Vec<Notice>,
}

#[derive(Serialize)]
struct ListPage {
    recipes: Page<RecipeSummary>,
    categories: Vec<Category>,
    filters: RecipeFilter,
    flash: Vec<Notice>,
}

#[derive(Serialize)]
struct CreatePage {
    categories: Vec<Category>,
}

#[derive(Serialize)]
struct DetailPage {
    #[serde(flatten)]
    detail: RecipeDetail,
    flash: Vec<Notice>,
}

#[handler]
pub(crate) async fn home(depot: &mut Depot, res: &mut Response) -> Result<(), AppError> {
    let feed = store(depot)?.home_feed().await?;
    res.render(Json(HomePage {
        feed,
        flash: notices(depot),
    }));
    Ok(())
}

#[handler]
pub(crate) async fn index(req: &mut Request, depot: &mut Depot, res: &mut Response) -> Result<(), AppError> {
    let (filters, page) = form::listing_query(req)?;
    let store = store(depot)?;
    let recipes = store.list(&filters, page).await?;
    let categories = store.categories().await?;
    res.render(Json(ListPage {
        recipes,
        categories,
        filters,
        flash: notices(depot),
    }));
    Ok(())
}

#[handler]
pub(crate) async fn create_form(depot: &mut Depot, res: &mut Response) -> Result<(), AppError> {
    require_user(depot)?;
    let categories = store(depot)?.categories().await?;
    res.render(Json(CreatePage { categories }));
    Ok(())
}

#[handler]
pub(crate) async fn create(req: &mut Request, depot: &mut Depot, res: &mut Response) -> Result<(), AppError> {
    let author = require_user(depot)?;
    let state = state(depot)?;
    let (store, image) = (state.store.clone(), state.placeholder_image.clone());
    let draft = RecipeForm::parse(req).await?.into_draft(image);

    let id = store.create(author, &draft).await?;
    depot.outgoing_flash_mut().success("Recipe created.");
    res.render(Redirect::other(format!("/recipes/{id}")));
    Ok(())
}

/// Detail document. Each successful call counts one view.
#[handler]
pub(crate) async fn show(req: &mut Request, depot: &mut Depot, res: &mut Response) -> Result<(), AppError> {
    let id = form::recipe_id(req)?;
    let detail = store(depot)?.detail(id, depot.current_user()).await?;
    res.render(Json(DetailPage {
        detail,
        flash: notices(depot),
    }));
    Ok(())
}

#[handler]
pub(crate) async fn edit(req: &mut Request, depot: &mut Depot, res: &mut Response) -> Result<(), AppError> {
    let id = form::recipe_id(req)?;
    let caller = require_user(depot)?;
    let form = store(depot)?.edit_form(caller, id).await?;
    res.render(Json(form));
    Ok(())
}

/// Replace a recipe's fields, ingredients and steps. The stored image is kept.
#[handler]
pub(crate) async fn update(req: &mut Request, depot: &mut Depot, res: &mut Response) -> Result<(), AppError> {
    let id = form::recipe_id(req)?;
    let caller = require_user(depot)?;
    let store = store(depot)?;
    let image = store.find(id).await?.image;
    let draft = RecipeForm::parse(req).await?.into_draft(image);

    store.update(caller, id, &draft).await?;
    depot.outgoing_flash_mut().success("Recipe updated.");
    res.render(Redirect::other(format!("/recipes/{id}")));
    Ok(())
}

#[handler]
pub(crate) async fn destroy(req: &mut Request, depot: &mut Depot, res: &mut Response) -> Result<(), AppError> {
    let id = form::recipe_id(req)?;
    let caller = require_user(depot)?;
    store(depot)?.delete(caller, id).await?;
    depot.outgoing_flash_mut().success("Recipe deleted.");
    res.render(Redirect::other("/recipes"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use tracing_test::traced_test;
    use uuid::Uuid;

    use super::super::testing::{self, BASE, PLACEHOLDER, cookie_header, location, recipe_url};

    fn pasta_body() -> Value {
        json!({
            "title": "Pasta",
            "description": "Simple pasta",
            "category": 2,
            "ingredients": [
                {"name": "flour", "quantity": "200g"},
                {"name": "egg", "quantity": "2"},
            ],
            "steps": ["boil water", "add pasta", "drain"],
        })
    }

    #[tokio::test]
    async fn test_home_feed_document() {
        let store = testing::store().await;
        let chef = store.create_user("chef").await.unwrap();
        let id = store.create(chef, &testing::draft("Onigiri", 1)).await.unwrap();

        let mut res = TestClient::get(BASE).send(&testing::service(&store, None)).await;
        assert_eq!(res.status_code, Some(StatusCode::OK));
        let body: Value = res.take_json().await.unwrap();
        assert_eq!(body["latest"][0]["id"], json!(id));
        assert_eq!(body["popular"][0]["owner_name"], "chef");
        assert_eq!(body["flash"], json!([]));
    }

    #[tokio::test]
    async fn test_listing_query() {
        let store = testing::store().await;
        let chef = store.create_user("chef").await.unwrap();
        store.create(chef, &testing::draft("Onigiri", 1)).await.unwrap();
        store.create(chef, &testing::draft("Tiramisu", 4)).await.unwrap();
        store.create(chef, &testing::draft("Gyoza", 3)).await.unwrap();
        let service = testing::service(&store, None);

        let mut res = TestClient::get(format!("{BASE}/recipes"))
            .query("categories[]", "1")
            .query("categories[]", "4")
            .query("rating", "")
            .send(&service)
            .await;
        assert_eq!(res.status_code, Some(StatusCode::OK));
        let body: Value = res.take_json().await.unwrap();
        assert_eq!(body["recipes"]["total"], 2);
        let mut titles: Vec<_> = body["recipes"]["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["title"].as_str().unwrap().to_owned())
            .collect();
        titles.sort();
        assert_eq!(titles, vec!["Onigiri", "Tiramisu"]);
        assert_eq!(body["recipes"]["items"][0]["rating"], Value::Null);
        assert_eq!(body["filters"]["categories"], json!([1, 4]));
        assert_eq!(body["categories"].as_array().map(Vec::len), Some(5));

        let mut res = TestClient::get(format!("{BASE}/recipes"))
            .query("title", "gyo")
            .query("page", "nope")
            .send(&service)
            .await;
        let body: Value = res.take_json().await.unwrap();
        assert_eq!(body["recipes"]["total"], 1);
        assert_eq!(body["recipes"]["current_page"], 1);

        let res = TestClient::get(format!("{BASE}/recipes"))
            .query("rating", "high")
            .send(&service)
            .await;
        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn test_create_requires_user() {
        let store = testing::store().await;
        let service = testing::service(&store, None);

        let res = TestClient::get(format!("{BASE}/recipes/create")).send(&service).await;
        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
        let res = TestClient::post(format!("{BASE}/recipes"))
            .json(&pasta_body())
            .send(&service)
            .await;
        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
        assert_eq!(store.list(&Default::default(), 1).await.unwrap().total, 0);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_create_redirects_to_detail() {
        let store = testing::store().await;
        let chef = store.create_user("chef").await.unwrap();
        let service = testing::service(&store, Some(chef));

        let mut res = TestClient::get(format!("{BASE}/recipes/create")).send(&service).await;
        assert_eq!(res.status_code, Some(StatusCode::OK));
        let body: Value = res.take_json().await.unwrap();
        assert_eq!(body["categories"][1]["name"], "Western");

        let res = TestClient::post(format!("{BASE}/recipes"))
            .json(&pasta_body())
            .send(&service)
            .await;
        assert_eq!(res.status_code, Some(StatusCode::SEE_OTHER));
        let target = location(&res);
        let id: Uuid = target.trim_start_matches("/recipes/").parse().unwrap();

        let detail = store.detail(id, Some(chef)).await.unwrap();
        assert_eq!(detail.recipe.title, "Pasta");
        assert_eq!(detail.recipe.image, PLACEHOLDER);
        assert_eq!(detail.ingredients.len(), 2);
        let numbers: Vec<_> = detail.steps.iter().map(|step| step.step_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(detail.is_owner);
        // The store records the write; the handler adds no second line.
        assert!(!logs_contain("recipe created"));

        // The flash message shows up on the next page.
        let mut res = TestClient::get(BASE)
            .add_header("cookie", cookie_header(&res), true)
            .send(&service)
            .await;
        let body: Value = res.take_json().await.unwrap();
        assert_eq!(body["flash"][0]["message"], "Recipe created.");
    }

    #[tokio::test]
    async fn test_create_rejections() {
        let store = testing::store().await;
        let chef = store.create_user("chef").await.unwrap();
        let service = testing::service(&store, Some(chef));

        let mut blank = pasta_body();
        blank["title"] = json!(" ");
        let res = TestClient::post(format!("{BASE}/recipes")).json(&blank).send(&service).await;
        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        let mut unknown = pasta_body();
        unknown["category"] = json!(99);
        let res = TestClient::post(format!("{BASE}/recipes")).json(&unknown).send(&service).await;
        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        let res = TestClient::post(format!("{BASE}/recipes"))
            .raw_json("{\"title\": ")
            .send(&service)
            .await;
        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        assert_eq!(store.list(&Default::default(), 1).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_show_counts_views() {
        let store = testing::store().await;
        let chef = store.create_user("chef").await.unwrap();
        let id = store.create(chef, &testing::draft("Onigiri", 1)).await.unwrap();
        let service = testing::service(&store, None);

        for expected in 0..3 {
            let mut res = TestClient::get(recipe_url(id)).send(&service).await;
            assert_eq!(res.status_code, Some(StatusCode::OK));
            let body: Value = res.take_json().await.unwrap();
            assert_eq!(body["views"], expected);
            assert_eq!(body["is_owner"], false);
            assert_eq!(body["steps"][1]["step_number"], 2);
        }
        assert_eq!(store.find(id).await.unwrap().views, 3);

        let res = TestClient::get(format!("{BASE}/recipes/not-a-uuid")).send(&service).await;
        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        let res = TestClient::get(recipe_url(Uuid::new_v4())).send(&service).await;
        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_edit_is_owner_only() {
        let store = testing::store().await;
        let chef = store.create_user("chef").await.unwrap();
        let guest = store.create_user("guest").await.unwrap();
        let id = store.create(chef, &testing::draft("Onigiri", 1)).await.unwrap();

        let res = TestClient::get(format!("{}/edit", recipe_url(id)))
            .send(&testing::service(&store, Some(guest)))
            .await;
        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        let mut res = TestClient::get(format!("{}/edit", recipe_url(id)))
            .send(&testing::service(&store, Some(chef)))
            .await;
        assert_eq!(res.status_code, Some(StatusCode::OK));
        let body: Value = res.take_json().await.unwrap();
        assert_eq!(body["recipe"]["title"], "Onigiri");
        assert_eq!(body["steps"].as_array().map(Vec::len), Some(2));
        assert_eq!(body["categories"].as_array().map(Vec::len), Some(5));
    }

    #[tokio::test]
    async fn test_update_replaces_children() {
        let store = testing::store().await;
        let chef = store.create_user("chef").await.unwrap();
        let guest = store.create_user("guest").await.unwrap();
        let id = store.create(chef, &testing::draft("Onigiri", 1)).await.unwrap();

        let res = TestClient::put(recipe_url(id))
            .json(&pasta_body())
            .send(&testing::service(&store, Some(guest)))
            .await;
        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
        assert_eq!(store.find(id).await.unwrap().title, "Onigiri");

        let res = TestClient::put(recipe_url(id))
            .json(&pasta_body())
            .send(&testing::service(&store, Some(chef)))
            .await;
        assert_eq!(res.status_code, Some(StatusCode::SEE_OTHER));
        assert_eq!(location(&res), format!("/recipes/{id}"));

        let recipe = store.find(id).await.unwrap();
        assert_eq!(recipe.title, "Pasta");
        assert_eq!(recipe.image, "https://example.com/dish.png");
        assert_eq!(store.ingredients(id).await.unwrap().len(), 2);
        assert_eq!(store.steps(id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_redirects_to_listing() {
        let store = testing::store().await;
        let chef = store.create_user("chef").await.unwrap();
        let guest = store.create_user("guest").await.unwrap();
        let id = store.create(chef, &testing::draft("Onigiri", 1)).await.unwrap();

        let res = TestClient::delete(recipe_url(id))
            .send(&testing::service(&store, Some(guest)))
            .await;
        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        let service = testing::service(&store, Some(chef));
        let res = TestClient::delete(recipe_url(id)).send(&service).await;
        assert_eq!(res.status_code, Some(StatusCode::SEE_OTHER));
        assert_eq!(location(&res), "/recipes");

        let res = TestClient::get(recipe_url(id)).send(&service).await;
        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }
}
