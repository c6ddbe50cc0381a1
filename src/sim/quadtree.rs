//! Depth-bounded quadtree over static, bounding-boxed items
//!
//! An item is stored at a node when its box spans all four quadrants around
//! the node's centre (or when the node sits at depth 0), otherwise it is
//! pushed into every quadrant it overlaps. Quadrant overlap is a closed test,
//! so an item touching the centre lines lands in more than one child.
//!
//! Build, insert, remove and query all use the same overlap rule, which is
//! what lets `remove` walk straight to the lists `insert` chose.

use std::collections::BTreeSet;
use std::fmt::Debug;

use glam::Vec2;

use super::geometry::Aabb;
use crate::error::SimError;

/// Anything the quadtree can index: a stable key plus a bounding box
pub trait Indexed {
    type Key: Copy + Ord + Debug;

    fn key(&self) -> Self::Key;
    fn bounds(&self) -> Aabb;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quadrant {
    Nw,
    Ne,
    Se,
    Sw,
}

impl Quadrant {
    const ALL: [Quadrant; 4] = [Quadrant::Nw, Quadrant::Ne, Quadrant::Se, Quadrant::Sw];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Which of the four (unbounded, closed) quadrants around a centre a box touches
#[derive(Debug, Clone, Copy)]
struct Overlap([bool; 4]);

impl Overlap {
    fn of(bounds: &Aabb, center: Vec2) -> Self {
        let west = bounds.left() <= center.x;
        let east = bounds.right() >= center.x;
        let north = bounds.top() <= center.y;
        let south = bounds.bottom() >= center.y;
        Self([west && north, east && north, east && south, west && south])
    }

    #[inline]
    fn all(&self) -> bool {
        self.0.iter().all(|&hit| hit)
    }

    #[inline]
    fn has(&self, quadrant: Quadrant) -> bool {
        self.0[quadrant.index()]
    }
}

type Entry<K> = (K, Aabb);

/// A quadtree node; the root is just the top node
#[derive(Debug, Clone)]
pub struct QuadTree<K> {
    bounds: Aabb,
    center: Vec2,
    depth: u32,
    items: Vec<Entry<K>>,
    children: [Option<Box<QuadTree<K>>>; 4],
}

impl<K: Copy + Ord + Debug> QuadTree<K> {
    /// Empty tree over a fixed rectangle
    pub fn new(bounds: Aabb, max_depth: u32) -> Self {
        Self {
            bounds,
            center: bounds.center(),
            depth: max_depth,
            items: Vec::new(),
            children: [None, None, None, None],
        }
    }

    /// Build a tree over `items`.
    ///
    /// Without an explicit `bounds` the rectangle is computed from the items,
    /// which then must not be empty.
    pub fn build<'a, I>(
        items: impl IntoIterator<Item = &'a I>,
        bounds: Option<Aabb>,
        max_depth: u32,
    ) -> Result<Self, SimError>
    where
        I: Indexed<Key = K> + 'a,
    {
        let entries: Vec<Entry<K>> = items.into_iter().map(|i| (i.key(), i.bounds())).collect();
        let bounds = match bounds {
            Some(bounds) => bounds,
            None => {
                let corners = entries.iter().flat_map(|(_, b)| {
                    [Vec2::new(b.left(), b.top()), Vec2::new(b.right(), b.bottom())]
                });
                Aabb::from_points(corners).ok_or(SimError::EmptyIndex)?
            }
        };
        Ok(Self::from_entries(entries, bounds, max_depth))
    }

    fn from_entries(entries: Vec<Entry<K>>, bounds: Aabb, depth: u32) -> Self {
        let mut node = Self::new(bounds, depth);

        // Depth floor: everything lives here, queries scan linearly
        if depth == 0 {
            node.items = entries;
            return node;
        }

        let mut staged: [Vec<Entry<K>>; 4] = Default::default();
        for entry in entries {
            let overlap = Overlap::of(&entry.1, node.center);
            if overlap.all() {
                node.items.push(entry);
            } else {
                for quadrant in Quadrant::ALL {
                    if overlap.has(quadrant) {
                        staged[quadrant.index()].push(entry);
                    }
                }
            }
        }

        for quadrant in Quadrant::ALL {
            let entries = std::mem::take(&mut staged[quadrant.index()]);
            if !entries.is_empty() {
                let child = Self::from_entries(entries, node.child_bounds(quadrant), depth - 1);
                node.children[quadrant.index()] = Some(Box::new(child));
            }
        }

        node
    }

    fn child_bounds(&self, quadrant: Quadrant) -> Aabb {
        let (l, t, r, b) = (
            self.bounds.left(),
            self.bounds.top(),
            self.bounds.right(),
            self.bounds.bottom(),
        );
        let c = self.center;
        match quadrant {
            Quadrant::Nw => Aabb::from_ltrb(l, t, c.x, c.y),
            Quadrant::Ne => Aabb::from_ltrb(c.x, t, r, c.y),
            Quadrant::Se => Aabb::from_ltrb(c.x, c.y, r, b),
            Quadrant::Sw => Aabb::from_ltrb(l, c.y, c.x, b),
        }
    }

    pub fn insert<I: Indexed<Key = K>>(&mut self, item: &I) {
        self.insert_entry((item.key(), item.bounds()));
    }

    fn insert_entry(&mut self, entry: Entry<K>) {
        if self.depth == 0 {
            self.items.push(entry);
            return;
        }

        let overlap = Overlap::of(&entry.1, self.center);
        if overlap.all() {
            self.items.push(entry);
            return;
        }

        for quadrant in Quadrant::ALL {
            if !overlap.has(quadrant) {
                continue;
            }
            let slot = quadrant.index();
            match &mut self.children[slot] {
                Some(child) => child.insert_entry(entry),
                None => {
                    let child =
                        Self::from_entries(vec![entry], self.child_bounds(quadrant), self.depth - 1);
                    self.children[slot] = Some(Box::new(child));
                }
            }
        }
    }

    /// Remove an item from exactly the lists its bounds select.
    ///
    /// The bounds must be the ones the item had when inserted; anything else
    /// (or an item that was never inserted) yields [`SimError::ItemNotFound`].
    pub fn remove<I: Indexed<Key = K>>(&mut self, item: &I) -> Result<(), SimError> {
        let (key, bounds) = (item.key(), item.bounds());
        // Check every selected list first so a failed removal leaves the tree untouched
        if !self.holds(key, &bounds) {
            return Err(SimError::ItemNotFound {
                key: format!("{key:?}"),
            });
        }
        self.remove_entry(key, &bounds);
        Ok(())
    }

    /// Whether every list selected by `bounds` holds `key`
    fn holds(&self, key: K, bounds: &Aabb) -> bool {
        if self.depth == 0 || Overlap::of(bounds, self.center).all() {
            return self.items.iter().any(|(k, _)| *k == key);
        }

        let overlap = Overlap::of(bounds, self.center);
        Quadrant::ALL
            .into_iter()
            .filter(|&q| overlap.has(q))
            .all(|q| {
                self.children[q.index()]
                    .as_ref()
                    .is_some_and(|child| child.holds(key, bounds))
            })
    }

    /// Remove `key` from the selected lists; callers check [`Self::holds`] first
    fn remove_entry(&mut self, key: K, bounds: &Aabb) {
        if self.depth == 0 || Overlap::of(bounds, self.center).all() {
            if let Some(pos) = self.items.iter().position(|(k, _)| *k == key) {
                self.items.remove(pos);
            }
            return;
        }

        let overlap = Overlap::of(bounds, self.center);
        for quadrant in Quadrant::ALL {
            if overlap.has(quadrant) {
                if let Some(child) = self.children[quadrant.index()].as_mut() {
                    child.remove_entry(key, bounds);
                }
            }
        }
    }

    /// Keys of every item whose box intersects `rect` (closed test)
    pub fn query(&self, rect: &Aabb) -> BTreeSet<K> {
        let mut hits = BTreeSet::new();
        self.query_into(rect, &mut hits);
        hits
    }

    fn query_into(&self, rect: &Aabb, hits: &mut BTreeSet<K>) {
        hits.extend(
            self.items
                .iter()
                .filter(|(_, b)| b.intersects(rect))
                .map(|(k, _)| *k),
        );

        let overlap = Overlap::of(rect, self.center);
        for quadrant in Quadrant::ALL {
            if let Some(child) = &self.children[quadrant.index()] {
                if overlap.has(quadrant) {
                    child.query_into(rect, hits);
                }
            }
        }
    }

    /// Keys of every item whose box contains `point`
    pub fn query_point(&self, point: Vec2) -> BTreeSet<K> {
        self.query(&Aabb::new(point.x, point.y, 0.0, 0.0))
    }

    /// Drop all items and children, leaving an empty leaf
    pub fn clear(&mut self) {
        self.items.clear();
        self.children = [None, None, None, None];
    }

    /// Every key stored anywhere in the tree
    pub fn keys(&self) -> BTreeSet<K> {
        let mut keys = BTreeSet::new();
        self.collect_keys(&mut keys);
        keys
    }

    fn collect_keys(&self, keys: &mut BTreeSet<K>) {
        keys.extend(self.items.iter().map(|(k, _)| *k));
        for child in self.children.iter().flatten() {
            child.collect_keys(keys);
        }
    }

    /// Number of distinct items stored
    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.children.iter().all(|c| c.as_ref().is_none_or(|c| c.is_empty()))
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Remaining subdivision depth at this node
    pub fn depth(&self) -> u32 {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, Copy)]
    struct Item {
        id: u32,
        bounds: Aabb,
    }

    impl Indexed for Item {
        type Key = u32;

        fn key(&self) -> u32 {
            self.id
        }

        fn bounds(&self) -> Aabb {
            self.bounds
        }
    }

    fn item(id: u32, x: f32, y: f32, w: f32, h: f32) -> Item {
        Item {
            id,
            bounds: Aabb::new(x, y, w, h),
        }
    }

    fn field() -> Aabb {
        Aabb::new(0.0, 0.0, 960.0, 540.0)
    }

    fn brute_force(items: &[Item], rect: &Aabb) -> BTreeSet<u32> {
        items
            .iter()
            .filter(|i| i.bounds.intersects(rect))
            .map(|i| i.id)
            .collect()
    }

    #[test]
    fn test_build_without_items_or_bounds_fails() {
        let err = QuadTree::<u32>::build(std::iter::empty::<&Item>(), None, 6).unwrap_err();
        assert!(matches!(err, SimError::EmptyIndex));
    }

    #[test]
    fn test_build_with_bounds_and_no_items() {
        let tree = QuadTree::<u32>::build(std::iter::empty::<&Item>(), Some(field()), 6).unwrap();
        assert!(tree.is_empty());
        assert!(tree.query(&field()).is_empty());
    }

    #[test]
    fn test_build_computes_bounds_from_items() {
        let items = [item(1, 10.0, 20.0, 5.0, 5.0), item(2, 100.0, 50.0, 10.0, 30.0)];
        let tree = QuadTree::build(&items, None, 6).unwrap();
        assert_eq!(tree.bounds(), Aabb::from_ltrb(10.0, 20.0, 110.0, 80.0));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_spanning_item_stays_at_root() {
        // Covers the centre (480, 270)
        let big = item(1, 400.0, 200.0, 200.0, 200.0);
        let small = item(2, 10.0, 10.0, 5.0, 5.0);
        let tree = QuadTree::build(&[big, small], Some(field()), 6).unwrap();
        assert_eq!(tree.items.len(), 1);
        assert_eq!(tree.items[0].0, 1);
        assert!(tree.children[Quadrant::Nw.index()].is_some());
        assert!(tree.children[Quadrant::Se.index()].is_none());
    }

    #[test]
    fn test_centre_line_item_goes_to_two_children() {
        // Touches x = 480 exactly, above the centre
        let edge = item(7, 470.0, 10.0, 10.0, 10.0);
        let tree = QuadTree::build(&[edge], Some(field()), 6).unwrap();
        assert!(tree.items.is_empty());
        assert!(tree.children[Quadrant::Nw.index()].is_some());
        assert!(tree.children[Quadrant::Ne.index()].is_some());
        // Still reported once
        assert_eq!(tree.query(&field()), BTreeSet::from([7]));
    }

    #[test]
    fn test_depth_zero_is_linear_scan() {
        let items = [item(1, 0.0, 0.0, 5.0, 5.0), item(2, 900.0, 500.0, 5.0, 5.0)];
        let tree = QuadTree::build(&items, Some(field()), 0).unwrap();
        assert_eq!(tree.items.len(), 2);
        assert!(tree.children.iter().all(Option::is_none));
        assert_eq!(tree.query(&Aabb::new(899.0, 499.0, 2.0, 2.0)), BTreeSet::from([2]));
    }

    #[test]
    fn test_insert_creates_children_lazily() {
        let mut tree = QuadTree::new(field(), 6);
        tree.insert(&item(3, 800.0, 400.0, 10.0, 10.0));
        assert!(tree.children[Quadrant::Se.index()].is_some());
        assert!(tree.children[Quadrant::Nw.index()].is_none());
        assert_eq!(tree.query_point(Vec2::new(805.0, 405.0)), BTreeSet::from([3]));
        assert!(tree.query_point(Vec2::new(100.0, 100.0)).is_empty());
    }

    #[test]
    fn test_remove_uses_the_insert_lists() {
        let a = item(1, 400.0, 200.0, 200.0, 200.0);
        let b = item(2, 470.0, 10.0, 10.0, 10.0);
        let mut tree = QuadTree::build(&[a, b], Some(field()), 6).unwrap();
        tree.remove(&b).unwrap();
        assert_eq!(tree.keys(), BTreeSet::from([1]));
        tree.remove(&a).unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_remove_missing_item_is_not_found() {
        let mut tree = QuadTree::build(&[item(1, 10.0, 10.0, 5.0, 5.0)], Some(field()), 6).unwrap();
        let err = tree.remove(&item(9, 10.0, 10.0, 5.0, 5.0)).unwrap_err();
        assert!(matches!(err, SimError::ItemNotFound { .. }));

        // Same key with different bounds is looked up where those bounds point
        let err = tree.remove(&item(1, 900.0, 500.0, 5.0, 5.0)).unwrap_err();
        assert!(matches!(err, SimError::ItemNotFound { .. }));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_failed_remove_leaves_tree_unchanged() {
        // Depth 1: the item lives only in the NW leaf
        let stored = item(1, 10.0, 10.0, 5.0, 5.0);
        let mut tree = QuadTree::build(&[stored], Some(field()), 1).unwrap();
        assert!(tree.children[Quadrant::Ne.index()].is_none());

        // Same key, bounds reaching across x = 480 into the empty NE quadrant
        let err = tree.remove(&item(1, 10.0, 10.0, 470.0, 5.0)).unwrap_err();
        assert!(matches!(err, SimError::ItemNotFound { .. }));
        assert_eq!(tree.keys(), BTreeSet::from([1]));
        assert_eq!(tree.query(&field()), BTreeSet::from([1]));

        tree.remove(&stored).unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_clear_resets_to_empty_leaf() {
        let items: Vec<Item> = (0..20)
            .map(|i| item(i, i as f32 * 40.0, i as f32 * 20.0, 8.0, 8.0))
            .collect();
        let mut tree = QuadTree::build(&items, Some(field()), 6).unwrap();
        assert_eq!(tree.len(), 20);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 6);
        tree.insert(&items[3]);
        assert_eq!(tree.keys(), BTreeSet::from([3]));
    }

    fn arb_item(id: u32) -> impl Strategy<Value = Item> {
        (-50.0f32..1000.0, -50.0f32..600.0, 0.0f32..150.0, 0.0f32..150.0)
            .prop_map(move |(x, y, w, h)| item(id, x, y, w, h))
    }

    fn arb_items() -> impl Strategy<Value = Vec<Item>> {
        prop::collection::vec(arb_item(0), 0..80).prop_map(|mut items| {
            for (i, it) in items.iter_mut().enumerate() {
                it.id = i as u32;
            }
            items
        })
    }

    fn arb_rect() -> impl Strategy<Value = Aabb> {
        (-100.0f32..1000.0, -100.0f32..600.0, 0.0f32..400.0, 0.0f32..400.0)
            .prop_map(|(x, y, w, h)| Aabb::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn prop_query_matches_brute_force(
            items in arb_items(),
            rects in prop::collection::vec(arb_rect(), 1..10),
            depth in 0u32..8,
        ) {
            let tree = QuadTree::build(&items, Some(field()), depth).unwrap();
            for rect in &rects {
                prop_assert_eq!(tree.query(rect), brute_force(&items, rect));
            }
        }

        #[test]
        fn prop_query_matches_brute_force_with_derived_bounds(
            items in arb_items(),
            rect in arb_rect(),
        ) {
            prop_assume!(!items.is_empty());
            let tree = QuadTree::build(&items, None, 6).unwrap();
            prop_assert_eq!(tree.query(&rect), brute_force(&items, &rect));
        }

        #[test]
        fn prop_insert_then_remove_is_identity(
            items in arb_items(),
            extra in arb_item(10_000),
            rect in arb_rect(),
        ) {
            let mut tree = QuadTree::build(&items, Some(field()), 6).unwrap();
            let before_keys = tree.keys();
            let before_hits = tree.query(&rect);

            tree.insert(&extra);
            prop_assert!(tree.keys().contains(&10_000));
            tree.remove(&extra).unwrap();

            prop_assert_eq!(tree.keys(), before_keys);
            prop_assert_eq!(tree.query(&rect), before_hits);
        }

        #[test]
        fn prop_incremental_insert_matches_build(items in arb_items(), rect in arb_rect()) {
            let mut tree = QuadTree::new(field(), 6);
            for i in &items {
                tree.insert(i);
            }
            prop_assert_eq!(tree.query(&rect), brute_force(&items, &rect));
        }
    }
}
