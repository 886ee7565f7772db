use gridjudge_cache::AssetManifest;
use gridjudge_core::{Element, Node};
use lazy_static::lazy_static;

const PAGE_WIDTH: &str = "700px";
const MEDIA_HEIGHT: &str = "290px";

/// One static onboarding screen
#[derive(Debug, Clone, PartialEq)]
pub struct InstructionPage {
    view: Element,
}

impl InstructionPage {
    /// Frame `body` the way every onboarding page is framed
    pub fn new(body: impl IntoIterator<Item = Node>) -> Self {
        let view = Element::new("div")
            .style("width", PAGE_WIDTH)
            .style("min-width", "300px")
            .style("margin", "auto 5em")
            .children(body);
        Self { view }
    }

    /// Page with a fixed-height media header followed by paragraphs
    pub fn with_media(media: impl IntoIterator<Item = Node>, paragraphs: &[&str]) -> Self {
        let header = Element::new("div")
            .style("height", MEDIA_HEIGHT)
            .style("text-align", "center")
            .children(media);
        let body = std::iter::once(Node::from(header))
            .chain(paragraphs.iter().map(|p| Element::new("p").text(p).into()));
        Self::new(body)
    }

    pub fn view(&self) -> &Element {
        &self.view
    }

    pub fn markup(&self) -> String {
        self.view.to_markup()
    }

    /// Every image source referenced on the page
    pub fn images(&self) -> impl Iterator<Item = &str> + '_ {
        self.view
            .find_all("img")
            .into_iter()
            .filter_map(|img| img.attr_value("src"))
    }
}

/// Ordered onboarding pages plus the assets to fetch before the first one
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InstructionPageSet {
    pages: Vec<InstructionPage>,
    preload: AssetManifest,
}

impl InstructionPageSet {
    pub fn new(pages: Vec<InstructionPage>, preload: AssetManifest) -> Self {
        Self { pages, preload }
    }

    pub fn pages(&self) -> &[InstructionPage] {
        &self.pages
    }

    pub fn page(&self, idx: usize) -> Option<&InstructionPage> {
        self.pages.get(idx)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn preload(&self) -> &AssetManifest {
        &self.preload
    }

    pub fn markup(&self) -> Vec<String> {
        self.pages.iter().map(InstructionPage::markup).collect()
    }

    /// Images shown on some page but missing from the preload list
    pub fn unlisted_images(&self) -> Vec<&str> {
        let mut missing: Vec<&str> = Vec::new();
        for src in self.pages.iter().flat_map(InstructionPage::images) {
            if !self.preload.contains(src) && !missing.contains(&src) {
                missing.push(src);
            }
        }
        missing
    }
}

/// Onboarding content for the grid-world judgment experiment
#[derive(Debug, Clone, PartialEq)]
pub struct GridworldInstructions {
    pub pages: InstructionPageSet,
    /// Statement judged during the worked example
    pub example_statement: String,
    /// Shown after the pages, before the comprehension check
    pub overview: Element,
    pub start_prompts: [Element; 2],
}

lazy_static! {
    static ref GRIDWORLD: GridworldInstructions = build_gridworld();
}

pub fn gridworld() -> &'static GridworldInstructions {
    &GRIDWORLD
}

pub const GRIDWORLD_PRELOAD: [&str; 18] = [
    "instructions/agent.png",
    "instructions/door_closed.png",
    "instructions/door_open.png",
    "instructions/instructions_00.png",
    "instructions/instructions_01.png",
    "instructions/instructions_full.gif",
    "instructions/instructions2.gif",
    "instructions/comprehension.png",
    "trials/example/00.png",
    "trials/example/01.png",
    "trials/example/02.png",
    "trials/example/03.png",
    "trials/example/04.png",
    "trials/example/05.png",
    "trials/example/06.png",
    "trials/example/07.png",
    "trials/example/08.png",
    "trials/example/full.gif",
];

fn img(src: &str, styles: &[(&str, &str)]) -> Node {
    styles
        .iter()
        .fold(Element::new("img").attr("src", src), |el, (p, v)| el.style(p, v))
        .into()
}

fn door(src: &str, caption: &str) -> Node {
    Element::new("div")
        .style("width", "40%")
        .style("margin", "6em 5% auto")
        .style("float", "left")
        .child(img(src, &[("width", "100%"), ("margin", "auto")]))
        .child(Element::new("br"))
        .child(Element::new("br"))
        .text(caption)
        .into()
}

fn example(frame: usize, paragraphs: &[&str]) -> InstructionPage {
    InstructionPage::with_media(
        [
            Element::new("h2").text("Example").into(),
            img(
                &format!("trials/example/{frame:02}.png"),
                &[("max-height", "100%"), ("width", "auto")],
            ),
        ],
        paragraphs,
    )
}

fn paragraphs(lines: &[&str]) -> Element {
    Element::new("div").children(lines.iter().map(|l| Element::new("p").text(l)))
}

fn build_gridworld() -> GridworldInstructions {
    let pages = vec![
        InstructionPage::with_media(
            [img("instructions/agent.png", &[("width", "60px"), ("margin-top", "10em")])],
            &["In this experiment, you will watch the player above moving around in different grids."],
        ),
        InstructionPage::with_media(
            [img("instructions/instructions_00.png", &[("margin-top", "2em")])],
            &["The player's goal is to reach the star in each grid. At the beginning of each \
               round, the player can pick one of two paths to take: the red path (top) or the \
               blue path (bottom). The player can see the whole grid and what each path looks like."],
        ),
        InstructionPage::with_media(
            [img("instructions/instructions_01.png", &[("margin-top", "2em")])],
            &[
                "Once the player picks a path, they move to the designated shaded start square \
                 for that path. They cannot change paths after they make their choice.",
                "Here, the player picked the red path.",
            ],
        ),
        InstructionPage::with_media(
            [img("instructions/instructions_full.gif", &[("margin-top", "2em")])],
            &[
                "On each step, the player can move up, down, left, right, or stay in place. \
                 They cannot move through walls. If they reach the star before time runs out, \
                 then they win.",
                "Above, you can watch the player move and see that they won this time!",
            ],
        ),
        InstructionPage::with_media(
            [
                door("instructions/door_closed.png", "closed door"),
                door("instructions/door_open.png", "open door"),
            ],
            &["Some of the paths contain doors, which are shown in gray. The player can pass \
               through a door only if it is open (has a gap in the middle)."],
        ),
        InstructionPage::with_media(
            [img(
                "instructions/instructions2.gif",
                &[("height", "80px"), ("width", "auto"), ("margin-top", "6em")],
            )],
            &["Doors can randomly open and close over time. Here, the door was closed at first, \
               but then opened, allowing the player to pass through."],
        ),
        example(
            0,
            &["Here is an example grid. There is currently one closed door on each path, and \
               the player can see this. The player has 8 timesteps to reach the star (the number \
               of timesteps remaining is shown on the right)."],
        ),
        example(1, &["The player picks the blue path this time."]),
        example(2, &["The player takes a step right and now faces a closed door."]),
        example(
            3,
            &["Both doors are still closed. Since the player cannot pass through, they just stay \
               where they are."],
        ),
        example(4, &["The door on the blue path opens."]),
        example(5, &["The player takes a step right, through the open door."]),
        example(6, &["The player takes another step right."]),
        example(7, &["The player takes a step up and reaches the star."]),
        example(
            8,
            &[
                "The player wins this time! And there are 2 timesteps remaining.",
                "On the next page, we will ask you to make a judgment about the result. You will \
                 be able to watch a video replay of what happened.",
            ],
        ),
    ];

    GridworldInstructions {
        pages: InstructionPageSet::new(pages, GRIDWORLD_PRELOAD.into_iter().collect()),
        example_statement: "The player won because they took the blue path this time.".to_string(),
        overview: paragraphs(&[
            "In this experiment, we will show you scenarios like this where the player takes one \
             of the two paths through the grid and either succeeds or fails to reach the star in \
             time. We want to know to what extent you think the player won or lost because of the \
             path they took.",
        ]),
        start_prompts: [
            paragraphs(&[
                "Correct! You will now watch the player for 18 rounds.",
                "On each round, you will first get to walk through a step-by-step play of what \
                 happened. You can proceed by either clicking the buttons or pressing arrow keys. \
                 Then, you will see a video replay of everything happened while you answer the \
                 question, just like in the example.",
            ]),
            paragraphs(&[
                "Remember, the player can only take one path each round but they can pick which \
                 path each time. They can see the whole grid at the beginning, including which \
                 doors are open and closed. They can only pass through a door if it is open (has a \
                 gap in the middle) and doors can randomly open or close at any time.",
                "Please do not refresh the page. Click the start button whenever you are ready.",
            ]),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gridworld_has_fifteen_framed_pages() {
        let set = &gridworld().pages;
        assert_eq!(set.len(), 15);
        for page in set.pages() {
            assert_eq!(page.view().style_value("width"), Some("700px"));
            let header = page.view().find_all("div")[1];
            assert_eq!(header.style_value("height"), Some("290px"));
        }
        assert!(set.page(15).is_none());
    }

    #[test]
    fn every_page_image_is_preloaded() {
        let set = &gridworld().pages;
        assert!(set.unlisted_images().is_empty());
        assert_eq!(set.preload().len(), 18);
        assert!(set.preload().contains("instructions/comprehension.png"));
    }

    #[test]
    fn example_pages_step_through_frames_in_order() {
        let frames: Vec<String> = gridworld().pages.pages()[6..]
            .iter()
            .flat_map(|p| p.images().map(str::to_string).collect::<Vec<_>>())
            .collect();
        let expected: Vec<String> = (0..9).map(|i| format!("trials/example/{i:02}.png")).collect();
        assert_eq!(frames, expected);
    }

    #[test]
    fn door_page_shows_both_states() {
        let page = gridworld().pages.page(4).unwrap();
        assert_eq!(
            page.images().collect::<Vec<_>>(),
            vec!["instructions/door_closed.png", "instructions/door_open.png"]
        );
        let text = page.view().text_content();
        assert!(text.contains("closed door") && text.contains("open door"));
    }

    #[test]
    fn unlisted_images_are_reported_once() {
        let page = InstructionPage::with_media([img("a.png", &[]), img("a.png", &[])], &["x"]);
        let set = InstructionPageSet::new(vec![page], AssetManifest::new());
        assert_eq!(set.unlisted_images(), vec!["a.png"]);
    }

    #[test]
    fn page_text_is_escaped_in_markup() {
        let page = InstructionPage::with_media([], &["The player's goal & <more>"]);
        assert!(page.markup().contains("The player's goal &amp; &lt;more&gt;"));
    }
}
